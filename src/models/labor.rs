//! Modelo de hojas de horas (mano de obra)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Estado de pago de una hoja de horas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Approved,
    Paid,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "approved" => Some(PaymentStatus::Approved),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Timesheet {
    pub id: i32,
    pub timesheet_code: String,
    pub worker_name: String,
    pub project_id: Option<i32>,
    pub work_date: NaiveDate,
    pub hours_worked: Decimal,
    pub hourly_rate: Decimal,
    pub performance_score: Option<Decimal>,
    pub payment_amount: Decimal,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TimesheetDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timesheet: Timesheet,
    pub project_name: Option<String>,
    pub project_number: Option<String>,
    pub created_by_name: Option<String>,
    pub modified_by_name: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct LaborTotals {
    pub total_timesheets: i64,
    pub total_workers: i64,
    pub total_hours: Decimal,
    pub total_payroll: Decimal,
    pub avg_hours_per_day: Option<Decimal>,
    pub avg_performance: Option<Decimal>,
    pub pending_payments: Decimal,
    pub approved_payments: Decimal,
    pub paid_amount: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct WorkerSummary {
    pub worker_name: String,
    pub timesheet_count: i64,
    pub total_hours: Decimal,
    pub total_earnings: Decimal,
    pub avg_performance: Option<Decimal>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ProjectLabor {
    pub project_name: Option<String>,
    pub project_number: Option<String>,
    pub timesheet_count: i64,
    pub total_hours: Decimal,
    pub labor_cost: Decimal,
}

#[derive(Debug, Serialize)]
pub struct LaborStats {
    #[serde(flatten)]
    pub totals: LaborTotals,
    pub top_workers: Vec<WorkerSummary>,
    pub labor_by_project: Vec<ProjectLabor>,
}

/// Fila del reporte de nómina: un trabajador por estado de pago
#[derive(Debug, Serialize, FromRow)]
pub struct PayrollRow {
    pub worker_name: String,
    pub days_worked: i64,
    pub total_hours: Decimal,
    pub avg_hourly_rate: Option<Decimal>,
    pub total_payment: Decimal,
    pub avg_performance: Option<Decimal>,
    pub payment_status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_parse() {
        assert_eq!(PaymentStatus::parse("paid"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse("approved").map(|s| s.as_str()), Some("approved"));
        assert_eq!(PaymentStatus::parse("refunded"), None);
        assert_eq!(PaymentStatus::parse("PAID"), None);
    }
}
