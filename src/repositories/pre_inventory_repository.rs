use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::dto::pre_inventory_dto::{CreatePreInventoryRequest, UpdateCountRequest};
use crate::models::pre_inventory::{
    discrepancy, CountResult, DiscrepancyReport, DiscrepancyRow, DiscrepancySummary, PreInventory,
    PreInventoryAdjustment, PreInventoryDetail, PreInventoryStats, PreInventoryStatus, PreInventoryTotals,
    RecentCount,
};
use crate::repositories::inventory_repository::{
    apply_stock_delta, insert_transaction, lock_material_stock, NewTransaction,
};
use crate::repositories::push_date_range;
use crate::utils::codes::{next_code, CodeKind};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::pagination::PageParams;
use crate::utils::stock::{location_stock, TYPE_ADJUSTMENT};

const DETAIL_SELECT: &str = r#"
    SELECT
        pi.*,
        m.material_code,
        m.material_name,
        mc.name AS category_name,
        uom.name AS unit_name,
        wl.name AS location_name,
        pis.status_name,
        u_counted.username AS counted_by_name,
        u_created.username AS created_by_name,
        u_updated.username AS updated_by_name,
        it.transaction_number AS adjustment_transaction_number
    FROM pre_inventory pi
    JOIN materials m ON pi.material_id = m.id
    LEFT JOIN cat_material_categories mc ON m.category_id = mc.id
    LEFT JOIN cat_unit_of_measure uom ON m.unit_of_measure_id = uom.id
    JOIN cat_warehouse_locations wl ON pi.warehouse_location_id = wl.id
    JOIN cat_pre_inventory_status pis ON pi.status_id = pis.id
    LEFT JOIN users u_counted ON pi.counted_by = u_counted.id
    LEFT JOIN users u_created ON pi.created_by = u_created.id
    LEFT JOIN users u_updated ON pi.updated_by = u_updated.id
    LEFT JOIN inventory_transactions it ON pi.adjustment_transaction_id = it.id
"#;

#[derive(Debug, Default)]
pub struct PreInventoryCriteria {
    pub material_id: Option<i32>,
    pub location_id: Option<i32>,
    pub status_id: Option<i32>,
    pub adjusted: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default)]
pub struct DiscrepancyCriteria {
    pub location_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub only_discrepancies: bool,
}

pub struct PreInventoryRepository {
    pool: PgPool,
}

impl PreInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &PreInventoryCriteria) {
        builder.push(" WHERE 1 = 1");
        if let Some(material_id) = criteria.material_id {
            builder.push(" AND pi.material_id = ").push_bind(material_id);
        }
        if let Some(location_id) = criteria.location_id {
            builder.push(" AND pi.warehouse_location_id = ").push_bind(location_id);
        }
        if let Some(status_id) = criteria.status_id {
            builder.push(" AND pi.status_id = ").push_bind(status_id);
        }
        if let Some(adjusted) = criteria.adjusted {
            builder.push(" AND pi.adjusted = ").push_bind(adjusted);
        }
        push_date_range(builder, "pi.count_date", criteria.start_date, criteria.end_date);
    }

    fn push_discrepancy_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &DiscrepancyCriteria) {
        builder.push(" WHERE pi.status_id >= 2");
        if let Some(location_id) = criteria.location_id {
            builder.push(" AND pi.warehouse_location_id = ").push_bind(location_id);
        }
        push_date_range(builder, "pi.count_date", criteria.start_date, criteria.end_date);
        if criteria.only_discrepancies {
            builder.push(" AND pi.discrepancy <> 0");
        }
    }

    pub async fn list(
        &self,
        params: &PageParams,
        criteria: &PreInventoryCriteria,
    ) -> Result<(Vec<PreInventoryDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        Self::push_where(&mut query, criteria);
        query
            .push(" ORDER BY pi.count_date DESC NULLS LAST, pi.created_date DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let records = query.build_query_as::<PreInventoryDetail>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM pre_inventory pi");
        Self::push_where(&mut count, criteria);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((records, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<PreInventoryDetail>, AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        query.push(" WHERE pi.id = ").push_bind(id);
        let record = query
            .build_query_as::<PreInventoryDetail>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn lock(conn: &mut PgConnection, id: i32) -> Result<PreInventory, AppError> {
        sqlx::query_as::<_, PreInventory>("SELECT * FROM pre_inventory WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| not_found_error("Pre-inventory record"))
    }

    /// Registra un conteo pendiente con el stock calculado de la ubicación
    pub async fn create(
        &self,
        material_id: i32,
        location_id: i32,
        request: &CreatePreInventoryRequest,
        user_id: i32,
    ) -> Result<PreInventory, AppError> {
        let mut tx = self.pool.begin().await?;

        let material = lock_material_stock(&mut tx, material_id)
            .await?
            .ok_or_else(|| not_found_error("Material"))?;
        let expected = location_stock(&mut tx, material_id, location_id).await?;
        let number = next_code(&mut tx, CodeKind::PreInventory).await?;

        let record = sqlx::query_as::<_, PreInventory>(
            r#"
            INSERT INTO pre_inventory (pre_inventory_number, material_id, warehouse_location_id,
                                       expected_quantity, unit_cost, count_date, notes, status_id,
                                       created_by)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(number)
        .bind(material_id)
        .bind(location_id)
        .bind(expected)
        .bind(material.unit_cost)
        .bind(request.count_date)
        .bind(request.notes.as_deref())
        .bind(PreInventoryStatus::Pending.id())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    pub async fn update_count(
        &self,
        id: i32,
        request: &UpdateCountRequest,
        user_id: i32,
    ) -> Result<CountResult, AppError> {
        let counted = request
            .counted_quantity
            .ok_or_else(|| bad_request_error("Counted quantity is required"))?;

        let mut tx = self.pool.begin().await?;
        let record = Self::lock(&mut tx, id).await?;
        record.ensure_countable()?;

        let (difference, value) = discrepancy(counted, record.expected_quantity, record.unit_cost);

        sqlx::query(
            r#"
            UPDATE pre_inventory SET
                counted_quantity = $2,
                discrepancy = $3,
                discrepancy_value = $4,
                counted_by = $5,
                count_date = NOW(),
                status_id = $6,
                notes = COALESCE($7, notes),
                updated_by = $5,
                updated_date = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(counted)
        .bind(difference)
        .bind(value)
        .bind(user_id)
        .bind(PreInventoryStatus::Counted.id())
        .bind(request.notes.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CountResult {
            counted_quantity: counted,
            discrepancy: difference,
            discrepancy_value: value,
        })
    }

    /// Escribe el movimiento de ajuste por la diferencia y marca el registro como ajustado
    pub async fn adjust(&self, id: i32, user_id: i32) -> Result<PreInventoryAdjustment, AppError> {
        let mut tx = self.pool.begin().await?;
        let record = Self::lock(&mut tx, id).await?;
        let quantity = record.adjustable_discrepancy()?;

        if lock_material_stock(&mut tx, record.material_id).await?.is_none() {
            return Err(not_found_error("Material"));
        }

        let transaction_number = next_code(&mut tx, CodeKind::InventoryTransaction).await?;
        let movement = insert_transaction(
            &mut tx,
            &NewTransaction {
                transaction_number: transaction_number.clone(),
                material_id: record.material_id,
                transaction_type_id: TYPE_ADJUSTMENT,
                warehouse_location_id: record.warehouse_location_id,
                quantity,
                unit_cost: record.unit_cost,
                project_id: None,
                purchase_order_id: None,
                reference_number: Some(record.pre_inventory_number.as_str()),
                notes: Some(format!("Adjustment from pre-inventory {}", record.pre_inventory_number)),
                transaction_date: None,
                created_by: user_id,
            },
        )
        .await?;
        let new_stock = apply_stock_delta(&mut tx, record.material_id, quantity, user_id).await?;

        sqlx::query(
            r#"
            UPDATE pre_inventory SET
                adjusted = TRUE,
                adjustment_transaction_id = $2,
                status_id = $3,
                updated_by = $4,
                updated_date = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(movement.id)
        .bind(PreInventoryStatus::Adjusted.id())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(PreInventoryAdjustment {
            transaction_number,
            adjustment_quantity: quantity,
            adjustment_value: movement.total_value.unwrap_or_default(),
            new_stock,
        })
    }

    pub async fn cancel(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let record = Self::lock(&mut tx, id).await?;
        if record.adjusted {
            return Err(bad_request_error("Cannot delete adjusted pre-inventory record"));
        }

        sqlx::query("UPDATE pre_inventory SET status_id = $2, updated_by = $3, updated_date = NOW() WHERE id = $1")
            .bind(id)
            .bind(PreInventoryStatus::Cancelled.id())
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn discrepancy_report(&self, criteria: &DiscrepancyCriteria) -> Result<DiscrepancyReport, AppError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                pi.id,
                pi.pre_inventory_number,
                pi.material_id,
                m.material_code,
                m.material_name,
                mc.name AS category_name,
                wl.name AS location_name,
                pi.expected_quantity,
                pi.counted_quantity,
                pi.discrepancy,
                pi.unit_cost,
                pi.discrepancy_value,
                pi.adjusted,
                pi.adjustment_transaction_id,
                pi.count_date,
                u_counted.username AS counted_by_name
            FROM pre_inventory pi
            JOIN materials m ON pi.material_id = m.id
            LEFT JOIN cat_material_categories mc ON m.category_id = mc.id
            JOIN cat_warehouse_locations wl ON pi.warehouse_location_id = wl.id
            LEFT JOIN users u_counted ON pi.counted_by = u_counted.id
            "#,
        );
        Self::push_discrepancy_where(&mut query, criteria);
        query.push(" ORDER BY ABS(COALESCE(pi.discrepancy_value, 0)) DESC, pi.count_date DESC");
        let details = query.build_query_as::<DiscrepancyRow>().fetch_all(&self.pool).await?;

        let mut summary = QueryBuilder::new(
            r#"
            SELECT
                COUNT(*) AS total_counts,
                COUNT(*) FILTER (WHERE pi.discrepancy <> 0) AS discrepancies_count,
                COUNT(*) FILTER (WHERE pi.discrepancy > 0) AS overages,
                COUNT(*) FILTER (WHERE pi.discrepancy < 0) AS shortages,
                COUNT(*) FILTER (WHERE pi.adjusted) AS adjustments_processed,
                COALESCE(SUM(pi.discrepancy_value), 0) AS total_discrepancy_value
            FROM pre_inventory pi
            "#,
        );
        Self::push_discrepancy_where(&mut summary, criteria);
        let summary = summary
            .build_query_as::<DiscrepancySummary>()
            .fetch_one(&self.pool)
            .await?;

        Ok(DiscrepancyReport { summary, details })
    }

    pub async fn stats(&self) -> Result<PreInventoryStats, AppError> {
        let totals = sqlx::query_as::<_, PreInventoryTotals>(
            r#"
            SELECT
                COUNT(*) AS total_counts,
                COUNT(*) FILTER (WHERE status_id = 1) AS pending_counts,
                COUNT(*) FILTER (WHERE status_id = 2) AS completed_counts,
                COUNT(*) FILTER (WHERE status_id = 3) AS adjusted_counts,
                COUNT(*) FILTER (WHERE status_id = 4) AS cancelled_counts,
                COUNT(*) FILTER (WHERE discrepancy <> 0 AND status_id >= 2) AS with_discrepancies,
                COUNT(*) FILTER (WHERE discrepancy > 0) AS overages,
                COUNT(*) FILTER (WHERE discrepancy < 0) AS shortages,
                COALESCE(SUM(discrepancy_value) FILTER (WHERE discrepancy_value > 0), 0) AS total_overage_value,
                COALESCE(SUM(ABS(discrepancy_value)) FILTER (WHERE discrepancy_value < 0), 0) AS total_shortage_value,
                COALESCE(SUM(ABS(discrepancy_value)), 0) AS total_discrepancy_value
            FROM pre_inventory
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let recent_counts = sqlx::query_as::<_, RecentCount>(
            r#"
            SELECT
                pi.id,
                pi.pre_inventory_number,
                m.material_name,
                wl.name AS location_name,
                pi.discrepancy,
                pi.discrepancy_value,
                pi.count_date
            FROM pre_inventory pi
            JOIN materials m ON pi.material_id = m.id
            JOIN cat_warehouse_locations wl ON pi.warehouse_location_id = wl.id
            WHERE pi.status_id >= 2
            ORDER BY pi.count_date DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(PreInventoryStats { totals, recent_counts })
    }
}
