use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::common_dto::ReportPeriod;
use crate::dto::labor_dto::{payment_for, CreateTimesheetRequest, UpdateTimesheetRequest};
use crate::models::labor::{
    LaborStats, LaborTotals, PaymentStatus, PayrollRow, ProjectLabor, Timesheet, TimesheetDetail,
    WorkerSummary,
};
use crate::repositories::push_date_range;
use crate::utils::codes::{next_code, CodeKind};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageParams;

const DETAIL_SELECT: &str = r#"
    SELECT
        lt.*,
        p.project_name,
        p.project_number,
        uc.username AS created_by_name,
        um.username AS modified_by_name
    FROM labor_timesheets lt
    LEFT JOIN projects p ON lt.project_id = p.id
    LEFT JOIN users uc ON lt.created_by = uc.id
    LEFT JOIN users um ON lt.modified_by = um.id
"#;

#[derive(Debug, Default)]
pub struct TimesheetCriteria {
    pub search: Option<String>,
    pub project_id: Option<i32>,
    pub payment_status: Option<PaymentStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub struct LaborRepository {
    pool: PgPool,
}

impl LaborRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &TimesheetCriteria) {
        builder.push(" WHERE lt.is_active = TRUE");
        if let Some(pattern) = &criteria.search {
            builder
                .push(" AND (lt.worker_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR lt.timesheet_code ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
        if let Some(project_id) = criteria.project_id {
            builder.push(" AND lt.project_id = ").push_bind(project_id);
        }
        if let Some(status) = criteria.payment_status {
            builder.push(" AND lt.payment_status = ").push_bind(status.as_str());
        }
        push_date_range(builder, "lt.work_date", criteria.start_date, criteria.end_date);
    }

    pub async fn list(
        &self,
        params: &PageParams,
        criteria: &TimesheetCriteria,
    ) -> Result<(Vec<TimesheetDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        Self::push_where(&mut query, criteria);
        query
            .push(" ORDER BY lt.work_date DESC, lt.worker_name ASC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let timesheets = query.build_query_as::<TimesheetDetail>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM labor_timesheets lt");
        Self::push_where(&mut count, criteria);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((timesheets, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<TimesheetDetail>, AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        query.push(" WHERE lt.id = ").push_bind(id).push(" AND lt.is_active = TRUE");
        let timesheet = query
            .build_query_as::<TimesheetDetail>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(timesheet)
    }

    pub async fn stats(&self) -> Result<LaborStats, AppError> {
        let totals = sqlx::query_as::<_, LaborTotals>(
            r#"
            SELECT
                COUNT(*) AS total_timesheets,
                COUNT(DISTINCT worker_name) AS total_workers,
                COALESCE(SUM(hours_worked), 0) AS total_hours,
                COALESCE(SUM(payment_amount), 0) AS total_payroll,
                AVG(hours_worked) AS avg_hours_per_day,
                AVG(performance_score) AS avg_performance,
                COALESCE(SUM(payment_amount) FILTER (WHERE payment_status = 'pending'), 0) AS pending_payments,
                COALESCE(SUM(payment_amount) FILTER (WHERE payment_status = 'approved'), 0) AS approved_payments,
                COALESCE(SUM(payment_amount) FILTER (WHERE payment_status = 'paid'), 0) AS paid_amount
            FROM labor_timesheets
            WHERE is_active = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let top_workers = sqlx::query_as::<_, WorkerSummary>(
            r#"
            SELECT
                worker_name,
                COUNT(*) AS timesheet_count,
                SUM(hours_worked) AS total_hours,
                SUM(payment_amount) AS total_earnings,
                AVG(performance_score) AS avg_performance
            FROM labor_timesheets
            WHERE is_active = TRUE
            GROUP BY worker_name
            ORDER BY total_hours DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let labor_by_project = sqlx::query_as::<_, ProjectLabor>(
            r#"
            SELECT
                p.project_name,
                p.project_number,
                COUNT(*) AS timesheet_count,
                SUM(lt.hours_worked) AS total_hours,
                SUM(lt.payment_amount) AS labor_cost
            FROM labor_timesheets lt
            LEFT JOIN projects p ON lt.project_id = p.id
            WHERE lt.is_active = TRUE AND lt.project_id IS NOT NULL
            GROUP BY p.id, p.project_name, p.project_number
            ORDER BY labor_cost DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(LaborStats {
            totals,
            top_workers,
            labor_by_project,
        })
    }

    pub async fn payroll(
        &self,
        period: &ReportPeriod,
        payment_status: Option<PaymentStatus>,
    ) -> Result<Vec<PayrollRow>, AppError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                lt.worker_name,
                COUNT(*) AS days_worked,
                SUM(lt.hours_worked) AS total_hours,
                AVG(lt.hourly_rate) AS avg_hourly_rate,
                SUM(lt.payment_amount) AS total_payment,
                AVG(lt.performance_score) AS avg_performance,
                lt.payment_status
            FROM labor_timesheets lt
            WHERE lt.is_active = TRUE
            "#,
        );
        push_date_range(&mut query, "lt.work_date", Some(period.start_date), Some(period.end_date));
        if let Some(status) = payment_status {
            query.push(" AND lt.payment_status = ").push_bind(status.as_str());
        }
        query.push(" GROUP BY lt.worker_name, lt.payment_status ORDER BY total_payment DESC");

        let rows = query.build_query_as::<PayrollRow>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn create(&self, request: &CreateTimesheetRequest, user_id: i32) -> Result<Timesheet, AppError> {
        let mut tx = self.pool.begin().await?;

        let timesheet_code = match request.timesheet_code.as_deref() {
            Some(code) => code.to_string(),
            None => next_code(&mut tx, CodeKind::Timesheet).await?,
        };

        let timesheet = sqlx::query_as::<_, Timesheet>(
            r#"
            INSERT INTO labor_timesheets (timesheet_code, worker_name, project_id, work_date,
                                          hours_worked, hourly_rate, performance_score,
                                          payment_amount, payment_status, notes,
                                          created_by, modified_by)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, 0), $7, $8,
                    COALESCE($9, 'pending'), $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(timesheet_code)
        .bind(request.worker_name.as_deref().map(str::trim))
        .bind(request.project_id)
        .bind(request.work_date)
        .bind(request.hours_worked)
        .bind(request.hourly_rate)
        .bind(request.performance_score)
        .bind(request.payment_amount())
        .bind(request.payment_status.as_deref())
        .bind(request.notes.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(timesheet)
    }

    /// Actualización parcial; el pago se recalcula si cambian horas o tarifa
    pub async fn update(
        &self,
        id: i32,
        request: &UpdateTimesheetRequest,
        user_id: i32,
    ) -> Result<Option<Timesheet>, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Timesheet>(
            "SELECT * FROM labor_timesheets WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let current = match current {
            Some(current) => current,
            None => return Ok(None),
        };

        let payment_amount = if request.changes_payment_basis() {
            Some(payment_for(
                request.hours_worked.unwrap_or(current.hours_worked),
                request.hourly_rate.unwrap_or(current.hourly_rate),
            ))
        } else {
            request.payment_amount
        };

        let timesheet = sqlx::query_as::<_, Timesheet>(
            r#"
            UPDATE labor_timesheets SET
                worker_name = COALESCE($2, worker_name),
                project_id = COALESCE($3, project_id),
                work_date = COALESCE($4, work_date),
                hours_worked = COALESCE($5, hours_worked),
                hourly_rate = COALESCE($6, hourly_rate),
                performance_score = COALESCE($7, performance_score),
                payment_amount = COALESCE($8, payment_amount),
                notes = COALESCE($9, notes),
                modified_by = $10,
                modified_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.worker_name.as_deref())
        .bind(request.project_id)
        .bind(request.work_date)
        .bind(request.hours_worked)
        .bind(request.hourly_rate)
        .bind(request.performance_score)
        .bind(payment_amount)
        .bind(request.notes.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(timesheet))
    }

    pub async fn set_payment_status(
        &self,
        id: i32,
        status: PaymentStatus,
        user_id: i32,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE labor_timesheets
            SET payment_status = $2, modified_by = $3, modified_date = NOW()
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE labor_timesheets SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
