use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::common_dto::ReportPeriod;
use crate::dto::fuel_requisition_dto::{
    fuel_total, CreateFuelRequisitionRequest, UpdateFuelRequisitionRequest,
};
use crate::models::fuel_requisition::{
    ConsumptionRow, FuelRequisition, FuelRequisitionDetail, FuelStats, FuelTotals, FuelType, ProjectFuel,
    RequisitionStatus, VehicleConsumption,
};
use crate::repositories::push_date_range;
use crate::utils::codes::{next_code, CodeKind};
use crate::utils::errors::{bad_request_error, not_found_or_deleted, AppError};
use crate::utils::pagination::PageParams;

const DETAIL_SELECT: &str = r#"
    SELECT
        fr.*,
        p.project_name,
        p.project_number,
        uc.username AS created_by_name,
        um.username AS modified_by_name,
        ua.username AS approved_by_name
    FROM fuel_requisitions fr
    LEFT JOIN projects p ON fr.project_id = p.id
    LEFT JOIN users uc ON fr.created_by = uc.id
    LEFT JOIN users um ON fr.modified_by = um.id
    LEFT JOIN users ua ON fr.approved_by = ua.id
"#;

#[derive(Debug, Default)]
pub struct RequisitionCriteria {
    pub search: Option<String>,
    pub project_id: Option<i32>,
    pub status: Option<RequisitionStatus>,
    pub fuel_type: Option<FuelType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub struct FuelRequisitionRepository {
    pool: PgPool,
}

impl FuelRequisitionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &RequisitionCriteria) {
        builder.push(" WHERE fr.is_active = TRUE");
        if let Some(pattern) = &criteria.search {
            builder
                .push(" AND (fr.vehicle_equipment_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR fr.requisition_code ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
        if let Some(project_id) = criteria.project_id {
            builder.push(" AND fr.project_id = ").push_bind(project_id);
        }
        if let Some(status) = criteria.status {
            builder.push(" AND fr.requisition_status = ").push_bind(status.as_str());
        }
        if let Some(fuel_type) = criteria.fuel_type {
            builder.push(" AND fr.fuel_type = ").push_bind(fuel_type.as_str());
        }
        push_date_range(builder, "fr.requisition_date", criteria.start_date, criteria.end_date);
    }

    pub async fn list(
        &self,
        params: &PageParams,
        criteria: &RequisitionCriteria,
    ) -> Result<(Vec<FuelRequisitionDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        Self::push_where(&mut query, criteria);
        query
            .push(" ORDER BY fr.requisition_date DESC, fr.created_date DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let requisitions = query
            .build_query_as::<FuelRequisitionDetail>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM fuel_requisitions fr");
        Self::push_where(&mut count, criteria);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((requisitions, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<FuelRequisitionDetail>, AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        query.push(" WHERE fr.id = ").push_bind(id).push(" AND fr.is_active = TRUE");
        let requisition = query
            .build_query_as::<FuelRequisitionDetail>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(requisition)
    }

    pub async fn stats(&self) -> Result<FuelStats, AppError> {
        let totals = sqlx::query_as::<_, FuelTotals>(
            r#"
            SELECT
                COUNT(*) AS total_requisitions,
                COUNT(DISTINCT vehicle_equipment_name) AS total_vehicles,
                COALESCE(SUM(quantity_liters), 0) AS total_liters,
                COALESCE(SUM(total_amount), 0) AS total_cost,
                AVG(quantity_liters) AS avg_liters_per_requisition,
                AVG(unit_price) AS avg_unit_price,
                COALESCE(SUM(total_amount) FILTER (WHERE requisition_status = 'pending'), 0) AS pending_amount,
                COALESCE(SUM(total_amount) FILTER (WHERE requisition_status = 'approved'), 0) AS approved_amount,
                COALESCE(SUM(total_amount) FILTER (WHERE requisition_status = 'delivered'), 0) AS delivered_amount,
                COALESCE(SUM(quantity_liters) FILTER (WHERE fuel_type = 'gasoline'), 0) AS gasoline_liters,
                COALESCE(SUM(quantity_liters) FILTER (WHERE fuel_type = 'diesel'), 0) AS diesel_liters,
                COALESCE(SUM(quantity_liters) FILTER (WHERE fuel_type = 'other'), 0) AS other_liters
            FROM fuel_requisitions
            WHERE is_active = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let top_vehicles = sqlx::query_as::<_, VehicleConsumption>(
            r#"
            SELECT
                vehicle_equipment_name,
                fuel_type,
                COUNT(*) AS requisition_count,
                SUM(quantity_liters) AS total_liters,
                SUM(total_amount) AS total_cost,
                AVG(quantity_liters) AS avg_liters
            FROM fuel_requisitions
            WHERE is_active = TRUE
            GROUP BY vehicle_equipment_name, fuel_type
            ORDER BY total_liters DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let fuel_by_project = sqlx::query_as::<_, ProjectFuel>(
            r#"
            SELECT
                p.project_name,
                p.project_number,
                COUNT(*) AS requisition_count,
                SUM(fr.quantity_liters) AS total_liters,
                SUM(fr.total_amount) AS fuel_cost
            FROM fuel_requisitions fr
            LEFT JOIN projects p ON fr.project_id = p.id
            WHERE fr.is_active = TRUE AND fr.project_id IS NOT NULL
            GROUP BY p.id, p.project_name, p.project_number
            ORDER BY fuel_cost DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(FuelStats {
            totals,
            top_vehicles,
            fuel_by_project,
        })
    }

    pub async fn consumption(
        &self,
        period: &ReportPeriod,
        fuel_type: Option<FuelType>,
        project_id: Option<i32>,
    ) -> Result<Vec<ConsumptionRow>, AppError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                fr.vehicle_equipment_name,
                fr.fuel_type,
                COUNT(*) AS requisitions_count,
                SUM(fr.quantity_liters) AS total_liters,
                AVG(fr.unit_price) AS avg_unit_price,
                SUM(fr.total_amount) AS total_cost,
                p.project_name,
                p.project_number
            FROM fuel_requisitions fr
            LEFT JOIN projects p ON fr.project_id = p.id
            WHERE fr.is_active = TRUE
            "#,
        );
        push_date_range(&mut query, "fr.requisition_date", Some(period.start_date), Some(period.end_date));
        if let Some(fuel_type) = fuel_type {
            query.push(" AND fr.fuel_type = ").push_bind(fuel_type.as_str());
        }
        if let Some(project_id) = project_id {
            query.push(" AND fr.project_id = ").push_bind(project_id);
        }
        query.push(
            " GROUP BY fr.vehicle_equipment_name, fr.fuel_type, p.project_name, p.project_number ORDER BY total_cost DESC",
        );

        let rows = query.build_query_as::<ConsumptionRow>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn create(
        &self,
        request: &CreateFuelRequisitionRequest,
        fuel_type: FuelType,
        user_id: i32,
    ) -> Result<FuelRequisition, AppError> {
        let mut tx = self.pool.begin().await?;

        let requisition_code = match request.requisition_code.as_deref() {
            Some(code) => code.to_string(),
            None => next_code(&mut tx, CodeKind::FuelRequisition).await?,
        };

        let requisition = sqlx::query_as::<_, FuelRequisition>(
            r#"
            INSERT INTO fuel_requisitions (requisition_code, vehicle_equipment_name, project_id,
                                           requisition_date, fuel_type, quantity_liters, unit_price,
                                           total_amount, odometer_reading, notes, created_by, modified_by)
            VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE), $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(requisition_code)
        .bind(request.vehicle_equipment_name.as_deref().map(str::trim))
        .bind(request.project_id)
        .bind(request.requisition_date)
        .bind(fuel_type.as_str())
        .bind(request.quantity_liters)
        .bind(request.unit_price)
        .bind(request.total_amount())
        .bind(request.odometer_reading)
        .bind(request.notes.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(requisition)
    }

    /// Actualización parcial; el total se recalcula si cambian litros o precio
    pub async fn update(
        &self,
        id: i32,
        request: &UpdateFuelRequisitionRequest,
        fuel_type: Option<FuelType>,
        user_id: i32,
    ) -> Result<Option<FuelRequisition>, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, FuelRequisition>(
            "SELECT * FROM fuel_requisitions WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let current = match current {
            Some(current) => current,
            None => return Ok(None),
        };

        let total_amount = if request.changes_total_basis() {
            Some(fuel_total(
                request.quantity_liters.unwrap_or(current.quantity_liters),
                request.unit_price.unwrap_or(current.unit_price),
            ))
        } else {
            request.total_amount
        };

        let requisition = sqlx::query_as::<_, FuelRequisition>(
            r#"
            UPDATE fuel_requisitions SET
                vehicle_equipment_name = COALESCE($2, vehicle_equipment_name),
                project_id = COALESCE($3, project_id),
                requisition_date = COALESCE($4, requisition_date),
                fuel_type = COALESCE($5, fuel_type),
                quantity_liters = COALESCE($6, quantity_liters),
                unit_price = COALESCE($7, unit_price),
                total_amount = COALESCE($8, total_amount),
                odometer_reading = COALESCE($9, odometer_reading),
                notes = COALESCE($10, notes),
                modified_by = $11,
                modified_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.vehicle_equipment_name.as_deref())
        .bind(request.project_id)
        .bind(request.requisition_date)
        .bind(fuel_type.map(|f| f.as_str()))
        .bind(request.quantity_liters)
        .bind(request.unit_price)
        .bind(total_amount)
        .bind(request.odometer_reading)
        .bind(request.notes.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(requisition))
    }

    /// Cambia el estado validando la transición con la fila bloqueada
    pub async fn set_status(
        &self,
        id: i32,
        next: RequisitionStatus,
        user_id: i32,
    ) -> Result<FuelRequisition, AppError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> = sqlx::query_scalar(
            "SELECT requisition_status FROM fuel_requisitions WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let current = current.ok_or_else(|| not_found_or_deleted("Fuel requisition"))?;

        let allowed = RequisitionStatus::parse(&current)
            .map(|status| status.can_transition_to(next))
            .unwrap_or(false);
        if !allowed {
            return Err(bad_request_error(&format!(
                "Cannot change status from {} to {}",
                current,
                next.as_str()
            )));
        }

        let requisition = sqlx::query_as::<_, FuelRequisition>(
            r#"
            UPDATE fuel_requisitions SET
                requisition_status = $2,
                approved_by = CASE WHEN $2 = 'approved' THEN $3 ELSE approved_by END,
                approved_date = CASE WHEN $2 = 'approved' THEN NOW() ELSE approved_date END,
                delivered_date = CASE WHEN $2 = 'delivered' THEN NOW() ELSE delivered_date END,
                modified_by = $3,
                modified_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(next.as_str())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(requisition)
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE fuel_requisitions SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
