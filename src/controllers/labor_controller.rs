use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{search_pattern, PaginatedResponse, PeriodResponse, ReportPeriod};
use crate::dto::labor_dto::{
    CreateTimesheetRequest, PayrollQuery, TimesheetFilter, UpdatePaymentStatusRequest, UpdateTimesheetRequest,
};
use crate::models::labor::{LaborStats, PaymentStatus, PayrollRow, Timesheet, TimesheetDetail};
use crate::repositories::labor_repository::{LaborRepository, TimesheetCriteria};
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};
use crate::utils::pagination::{PageParams, DEFAULT_LIMIT};
use crate::utils::validation::{parse_date_filter, require_text};

pub struct LaborController {
    repository: LaborRepository,
}

impl LaborController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LaborRepository::new(pool),
        }
    }

    pub async fn list(&self, filter: TimesheetFilter) -> Result<PaginatedResponse<TimesheetDetail>, AppError> {
        let params = PageParams::new(filter.page, filter.limit, DEFAULT_LIMIT);
        let criteria = TimesheetCriteria {
            search: search_pattern(filter.search.as_deref()),
            project_id: filter.project_id,
            payment_status: optional_payment_status(filter.payment_status.as_deref())?,
            start_date: parse_date_filter("start_date", filter.start_date.as_deref())?,
            end_date: parse_date_filter("end_date", filter.end_date.as_deref())?,
        };
        let (timesheets, total) = self.repository.list(&params, &criteria).await?;
        Ok(PaginatedResponse::new(timesheets, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<TimesheetDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Timesheet"))
    }

    pub async fn stats(&self) -> Result<LaborStats, AppError> {
        self.repository.stats().await
    }

    pub async fn payroll_report(&self, query: PayrollQuery) -> Result<PeriodResponse<PayrollRow>, AppError> {
        let period = ReportPeriod::required(query.start_date.as_deref(), query.end_date.as_deref())?;
        let status = optional_payment_status(query.payment_status.as_deref())?;
        let rows = self.repository.payroll(&period, status).await?;
        Ok(PeriodResponse::new(rows, period))
    }

    pub async fn create(&self, request: CreateTimesheetRequest, user_id: i32) -> Result<Timesheet, AppError> {
        if require_text(request.worker_name.as_deref()).is_none() || request.work_date.is_none() {
            return Err(bad_request_error("Worker name and work date are required"));
        }
        optional_payment_status(request.payment_status.as_deref())?;
        request.validate()?;

        let timesheet = self.repository.create(&request, user_id).await?;
        info!(
            "⏱️ Hoja de horas creada: {} ({}, {} h)",
            timesheet.timesheet_code, timesheet.worker_name, timesheet.hours_worked
        );
        Ok(timesheet)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateTimesheetRequest,
        user_id: i32,
    ) -> Result<Timesheet, AppError> {
        request.validate()?;
        self.repository
            .update(id, &request, user_id)
            .await?
            .ok_or_else(|| not_found_or_deleted("Timesheet"))
    }

    pub async fn update_payment_status(
        &self,
        id: i32,
        request: UpdatePaymentStatusRequest,
        user_id: i32,
    ) -> Result<(), AppError> {
        let status = request
            .payment_status
            .as_deref()
            .and_then(PaymentStatus::parse)
            .ok_or_else(|| bad_request_error("Invalid payment status"))?;

        if !self.repository.set_payment_status(id, status, user_id).await? {
            return Err(not_found_or_deleted("Timesheet"));
        }
        info!("💵 Hoja de horas {} con pago {}", id, status.as_str());
        Ok(())
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("Timesheet"));
        }
        Ok(())
    }
}

fn optional_payment_status(value: Option<&str>) -> Result<Option<PaymentStatus>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => PaymentStatus::parse(raw)
            .map(Some)
            .ok_or_else(|| bad_request_error("Invalid payment status")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_payment_status() {
        assert_eq!(optional_payment_status(None).unwrap(), None);
        assert_eq!(optional_payment_status(Some("")).unwrap(), None);
        assert_eq!(optional_payment_status(Some("paid")).unwrap(), Some(PaymentStatus::Paid));
        assert!(optional_payment_status(Some("overdue")).is_err());
    }
}
