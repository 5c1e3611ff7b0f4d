use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::warehouse::{
    AdjustmentResult, LocationStock, LocationStockValue, LocationSummary, StockReportRow,
    TransactionDetail, TransferDetail, TransferResult, WarehouseStats, WarehouseTotals,
};
use crate::repositories::push_date_range;
use crate::repositories::inventory_repository::{
    apply_stock_delta, insert_transaction, lock_material_stock, NewTransaction,
};
use crate::utils::codes::{format_code, next_number, CodeKind};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::pagination::PageParams;
use crate::utils::stock::{insufficient_stock, location_stock, MovementType, SIGNED_QUANTITY_SQL, TYPE_TRANSFER};

/// Filtros ya validados del kardex
#[derive(Debug, Default)]
pub struct TransactionCriteria {
    pub material_id: Option<i32>,
    pub location_id: Option<i32>,
    pub transaction_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default)]
pub struct TransferCriteria {
    pub material_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Transferencia validada
#[derive(Debug)]
pub struct Transfer {
    pub material_id: i32,
    pub from_location_id: i32,
    pub to_location_id: i32,
    pub quantity: Decimal,
    pub reason: Option<String>,
    pub transfer_date: Option<NaiveDate>,
}

/// Ajuste manual validado
#[derive(Debug)]
pub struct Adjustment {
    pub material_id: i32,
    pub warehouse_location_id: i32,
    pub quantity: Decimal,
    pub movement: MovementType,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

/// Rango de fechas inclusivo sobre una columna TIMESTAMPTZ
pub struct WarehouseRepository {
    pool: PgPool,
}

impl WarehouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn locations(&self) -> Result<Vec<LocationSummary>, AppError> {
        let sql = format!(
            r#"
            SELECT
                wl.id, wl.name, wl.alias, wl.address,
                COUNT(DISTINCT it.material_id) AS materials_count,
                COALESCE(SUM({}), 0) AS total_quantity
            FROM cat_warehouse_locations wl
            LEFT JOIN inventory_transactions it ON wl.id = it.warehouse_location_id
            LEFT JOIN cat_transaction_types tt ON it.transaction_type_id = tt.id
            GROUP BY wl.id, wl.name, wl.alias, wl.address
            ORDER BY wl.name ASC
            "#,
            SIGNED_QUANTITY_SQL
        );
        let locations = sqlx::query_as::<_, LocationSummary>(&sql).fetch_all(&self.pool).await?;
        Ok(locations)
    }

    pub async fn stock_by_location(
        &self,
        location_id: i32,
        search: Option<String>,
    ) -> Result<Vec<LocationStock>, AppError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            r#"
            SELECT
                m.id, m.material_code, m.material_name,
                mc.name AS category_name,
                uom.name AS unit_name,
                uom.alias AS unit_alias,
                COALESCE(SUM({}), 0) AS location_stock,
                m.current_stock AS total_stock,
                m.minimum_stock,
                m.unit_cost
            FROM materials m
            LEFT JOIN cat_material_categories mc ON m.category_id = mc.id
            LEFT JOIN cat_unit_of_measure uom ON m.unit_of_measure_id = uom.id
            LEFT JOIN inventory_transactions it ON m.id = it.material_id AND it.warehouse_location_id = "#,
            SIGNED_QUANTITY_SQL
        ));
        query
            .push_bind(location_id)
            .push(" LEFT JOIN cat_transaction_types tt ON it.transaction_type_id = tt.id WHERE m.is_active = TRUE");
        if let Some(pattern) = search {
            query
                .push(" AND (m.material_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR m.material_code ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(format!(
            " GROUP BY m.id, mc.name, uom.name, uom.alias HAVING COALESCE(SUM({}), 0) > 0 ORDER BY m.material_name ASC",
            SIGNED_QUANTITY_SQL
        ));

        let materials = query.build_query_as::<LocationStock>().fetch_all(&self.pool).await?;
        Ok(materials)
    }

    fn push_transaction_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &TransactionCriteria) {
        builder.push(" WHERE 1 = 1");
        if let Some(material_id) = criteria.material_id {
            builder.push(" AND it.material_id = ").push_bind(material_id);
        }
        if let Some(location_id) = criteria.location_id {
            builder.push(" AND it.warehouse_location_id = ").push_bind(location_id);
        }
        if let Some(alias) = &criteria.transaction_type {
            builder.push(" AND tt.alias = ").push_bind(alias.clone());
        }
        push_date_range(builder, "it.transaction_date", criteria.start_date, criteria.end_date);
    }

    pub async fn transactions(
        &self,
        params: &PageParams,
        criteria: &TransactionCriteria,
    ) -> Result<(Vec<TransactionDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                it.*,
                m.material_code,
                m.material_name,
                tt.name AS transaction_type,
                tt.alias AS transaction_type_alias,
                wl.name AS location_name,
                u.username AS created_by_name
            FROM inventory_transactions it
            JOIN materials m ON it.material_id = m.id
            JOIN cat_transaction_types tt ON it.transaction_type_id = tt.id
            JOIN cat_warehouse_locations wl ON it.warehouse_location_id = wl.id
            LEFT JOIN users u ON it.created_by = u.id
            "#,
        );
        Self::push_transaction_where(&mut query, criteria);
        query
            .push(" ORDER BY it.transaction_date DESC, it.created_date DESC, it.id DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let transactions = query.build_query_as::<TransactionDetail>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new(
            "SELECT COUNT(*) FROM inventory_transactions it JOIN cat_transaction_types tt ON it.transaction_type_id = tt.id",
        );
        Self::push_transaction_where(&mut count, criteria);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((transactions, total))
    }

    fn push_transfer_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &TransferCriteria) {
        builder.push(" WHERE 1 = 1");
        if let Some(material_id) = criteria.material_id {
            builder.push(" AND wr.material_id = ").push_bind(material_id);
        }
        push_date_range(builder, "wr.reorganization_date", criteria.start_date, criteria.end_date);
    }

    pub async fn transfers(
        &self,
        params: &PageParams,
        criteria: &TransferCriteria,
    ) -> Result<(Vec<TransferDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                wr.id, wr.material_id, m.material_code, m.material_name,
                wr.from_location_id, wl_from.name AS from_location_name,
                wr.to_location_id, wl_to.name AS to_location_name,
                wr.quantity, wr.reorganization_date, wr.reason,
                wr.performed_by, u.username AS performed_by_name,
                wr.created_date
            FROM warehouse_reorganization wr
            JOIN materials m ON wr.material_id = m.id
            JOIN cat_warehouse_locations wl_from ON wr.from_location_id = wl_from.id
            JOIN cat_warehouse_locations wl_to ON wr.to_location_id = wl_to.id
            LEFT JOIN users u ON wr.performed_by = u.id
            "#,
        );
        Self::push_transfer_where(&mut query, criteria);
        query
            .push(" ORDER BY wr.reorganization_date DESC, wr.created_date DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let transfers = query.build_query_as::<TransferDetail>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM warehouse_reorganization wr");
        Self::push_transfer_where(&mut count, criteria);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((transfers, total))
    }

    pub async fn stats(&self) -> Result<WarehouseStats, AppError> {
        let totals = sqlx::query_as::<_, WarehouseTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM cat_warehouse_locations) AS total_locations,
                COUNT(DISTINCT it.material_id) AS total_materials_in_stock,
                COUNT(it.id) AS total_transactions,
                COUNT(*) FILTER (WHERE tt.alias = 'entry') AS total_entries,
                COUNT(*) FILTER (WHERE tt.alias = 'exit') AS total_exits,
                COUNT(*) FILTER (WHERE tt.alias = 'transfer') AS total_transfers,
                COUNT(*) FILTER (WHERE tt.alias = 'adjustment') AS total_adjustments,
                COALESCE(SUM(ABS(it.total_value)) FILTER (WHERE tt.alias = 'entry'), 0) AS total_entries_value,
                COALESCE(SUM(ABS(it.total_value)) FILTER (WHERE tt.alias = 'exit'), 0) AS total_exits_value
            FROM inventory_transactions it
            JOIN cat_transaction_types tt ON it.transaction_type_id = tt.id
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT
                wl.id,
                wl.name AS location_name,
                COUNT(DISTINCT it.material_id) AS materials_count,
                COALESCE(SUM({signed}), 0) AS total_quantity,
                COALESCE(SUM(({signed}) * COALESCE(it.unit_cost, 0)), 0) AS stock_value
            FROM cat_warehouse_locations wl
            LEFT JOIN inventory_transactions it ON wl.id = it.warehouse_location_id
            LEFT JOIN cat_transaction_types tt ON it.transaction_type_id = tt.id
            GROUP BY wl.id, wl.name
            ORDER BY stock_value DESC
            "#,
            signed = SIGNED_QUANTITY_SQL
        );
        let stock_by_location = sqlx::query_as::<_, LocationStockValue>(&sql).fetch_all(&self.pool).await?;

        Ok(WarehouseStats {
            totals,
            stock_by_location,
        })
    }

    pub async fn stock_report(
        &self,
        location_id: Option<i32>,
        category_id: Option<i32>,
        low_stock: bool,
    ) -> Result<Vec<StockReportRow>, AppError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            r#"
            WITH stock AS (
                SELECT it.material_id, it.warehouse_location_id, SUM({}) AS location_stock
                FROM inventory_transactions it
                JOIN cat_transaction_types tt ON it.transaction_type_id = tt.id
                GROUP BY it.material_id, it.warehouse_location_id
            )
            SELECT
                m.id, m.material_code, m.material_name,
                mc.name AS category_name,
                uom.name AS unit_name,
                wl.id AS location_id,
                wl.name AS location_name,
                s.location_stock,
                m.current_stock AS total_stock,
                m.minimum_stock,
                m.reorder_point,
                m.unit_cost,
                s.location_stock * m.unit_cost AS stock_value
            FROM stock s
            JOIN materials m ON s.material_id = m.id
            JOIN cat_warehouse_locations wl ON s.warehouse_location_id = wl.id
            LEFT JOIN cat_material_categories mc ON m.category_id = mc.id
            LEFT JOIN cat_unit_of_measure uom ON m.unit_of_measure_id = uom.id
            WHERE m.is_active = TRUE AND s.location_stock > 0
            "#,
            SIGNED_QUANTITY_SQL
        ));
        if let Some(location_id) = location_id {
            query.push(" AND wl.id = ").push_bind(location_id);
        }
        if let Some(category_id) = category_id {
            query.push(" AND m.category_id = ").push_bind(category_id);
        }
        if low_stock {
            query.push(" AND s.location_stock < m.minimum_stock");
        }
        query.push(" ORDER BY m.material_name ASC, wl.name ASC");

        let report = query.build_query_as::<StockReportRow>().fetch_all(&self.pool).await?;
        Ok(report)
    }

    /// Dos tramos `transfer` (−q en origen, +q en destino) más la fila de
    /// `warehouse_reorganization`, todo en una transacción
    pub async fn transfer(&self, transfer: &Transfer, user_id: i32) -> Result<TransferResult, AppError> {
        let mut tx = self.pool.begin().await?;

        let material = lock_material_stock(&mut tx, transfer.material_id)
            .await?
            .ok_or_else(|| not_found_error("Material"))?;

        let available = location_stock(&mut tx, transfer.material_id, transfer.from_location_id).await?;
        if available < transfer.quantity {
            return Err(insufficient_stock(available));
        }

        let exit_number = next_number(&mut tx, CodeKind::InventoryTransaction).await?;
        let exit_transaction = format_code(CodeKind::InventoryTransaction.prefix(), exit_number);
        let entry_transaction = format_code(CodeKind::InventoryTransaction.prefix(), exit_number + 1);
        let suffix = transfer
            .reason
            .as_deref()
            .map(|reason| format!(": {}", reason))
            .unwrap_or_default();

        let exit_leg = NewTransaction {
            transaction_number: exit_transaction.clone(),
            material_id: transfer.material_id,
            transaction_type_id: TYPE_TRANSFER,
            warehouse_location_id: transfer.from_location_id,
            quantity: -transfer.quantity,
            unit_cost: material.unit_cost,
            project_id: None,
            purchase_order_id: None,
            reference_number: None,
            notes: Some(format!("Transfer to location {}{}", transfer.to_location_id, suffix)),
            transaction_date: transfer.transfer_date,
            created_by: user_id,
        };
        insert_transaction(&mut tx, &exit_leg).await?;

        let entry_leg = NewTransaction {
            transaction_number: entry_transaction.clone(),
            warehouse_location_id: transfer.to_location_id,
            quantity: transfer.quantity,
            notes: Some(format!("Transfer from location {}{}", transfer.from_location_id, suffix)),
            ..exit_leg
        };
        insert_transaction(&mut tx, &entry_leg).await?;

        sqlx::query(
            r#"
            INSERT INTO warehouse_reorganization (material_id, from_location_id, to_location_id,
                                                  quantity, reorganization_date, reason, performed_by)
            VALUES ($1, $2, $3, $4, COALESCE($5::timestamptz, NOW()), $6, $7)
            "#,
        )
        .bind(transfer.material_id)
        .bind(transfer.from_location_id)
        .bind(transfer.to_location_id)
        .bind(transfer.quantity)
        .bind(transfer.transfer_date)
        .bind(transfer.reason.as_deref())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(TransferResult {
            exit_transaction,
            entry_transaction,
        })
    }

    /// Movimiento manual; actualiza `materials.current_stock`
    pub async fn adjust(&self, adjustment: &Adjustment, user_id: i32) -> Result<AdjustmentResult, AppError> {
        let mut tx = self.pool.begin().await?;

        let material = lock_material_stock(&mut tx, adjustment.material_id)
            .await?
            .ok_or_else(|| not_found_error("Material"))?;

        let quantity = adjustment.movement.signed(adjustment.quantity);
        if adjustment.movement == MovementType::Exit {
            let available =
                location_stock(&mut tx, adjustment.material_id, adjustment.warehouse_location_id).await?;
            if available < -quantity {
                return Err(insufficient_stock(available));
            }
        }

        let transaction_number = format_code(
            CodeKind::InventoryTransaction.prefix(),
            next_number(&mut tx, CodeKind::InventoryTransaction).await?,
        );
        let movement = NewTransaction {
            transaction_number: transaction_number.clone(),
            material_id: adjustment.material_id,
            transaction_type_id: adjustment.movement.type_id(),
            warehouse_location_id: adjustment.warehouse_location_id,
            quantity,
            unit_cost: material.unit_cost,
            project_id: None,
            purchase_order_id: None,
            reference_number: adjustment.reference_number.as_deref(),
            notes: adjustment.notes.clone(),
            transaction_date: adjustment.transaction_date,
            created_by: user_id,
        };
        insert_transaction(&mut tx, &movement).await?;
        let new_stock = apply_stock_delta(&mut tx, adjustment.material_id, quantity, user_id).await?;

        tx.commit().await?;
        Ok(AdjustmentResult {
            transaction_number,
            new_stock,
        })
    }
}
