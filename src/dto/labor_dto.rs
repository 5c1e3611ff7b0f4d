use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{blank_as_none, validate_non_negative_decimal};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTimesheetRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 1, max = 50))]
    pub timesheet_code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub worker_name: Option<String>,
    pub project_id: Option<i32>,
    pub work_date: Option<NaiveDate>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub hours_worked: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub hourly_rate: Option<Decimal>,
    pub performance_score: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub payment_amount: Option<Decimal>,
    pub payment_status: Option<String>,
    pub notes: Option<String>,
}

impl CreateTimesheetRequest {
    /// Pago explícito o horas × tarifa
    pub fn payment_amount(&self) -> Decimal {
        match self.payment_amount {
            Some(amount) => amount,
            None => payment_for(
                self.hours_worked.unwrap_or_default(),
                self.hourly_rate.unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTimesheetRequest {
    #[validate(length(min = 1, max = 255))]
    pub worker_name: Option<String>,
    pub project_id: Option<i32>,
    pub work_date: Option<NaiveDate>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub hours_worked: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub hourly_rate: Option<Decimal>,
    pub performance_score: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub payment_amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl UpdateTimesheetRequest {
    pub fn changes_payment_basis(&self) -> bool {
        self.hours_worked.is_some() || self.hourly_rate.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimesheetFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub project_id: Option<i32>,
    pub payment_status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PayrollQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub payment_status: Option<String>,
}

pub fn payment_for(hours: Decimal, rate: Decimal) -> Decimal {
    (hours * rate).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_defaults_to_hours_times_rate() {
        let request: CreateTimesheetRequest =
            serde_json::from_str(r#"{"worker_name": "Luis", "hours_worked": "8.5", "hourly_rate": "120.00"}"#)
                .unwrap();
        assert_eq!(request.payment_amount(), Decimal::new(102000, 2));
    }

    #[test]
    fn test_explicit_payment_is_kept() {
        let request: CreateTimesheetRequest =
            serde_json::from_str(r#"{"hours_worked": 8, "hourly_rate": 100, "payment_amount": 750}"#).unwrap();
        assert_eq!(request.payment_amount(), Decimal::new(750, 0));
    }

    #[test]
    fn test_update_detects_payment_basis_change() {
        let request: UpdateTimesheetRequest = serde_json::from_str(r#"{"hourly_rate": 90}"#).unwrap();
        assert!(request.changes_payment_basis());
        assert!(!UpdateTimesheetRequest::default().changes_payment_basis());
    }
}
