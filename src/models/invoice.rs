//! Modelo de Invoice

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::utils::audit::{text, AuditFields};

/// Invoice - mapea exactamente a la tabla invoices
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invoice {
    pub id: i32,
    pub invoice_number: String,
    pub invoice_type_id: Option<i32>,
    pub invoice_status_id: Option<i32>,
    pub customer_id: i32,
    pub project_id: Option<i32>,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

impl AuditFields for Invoice {
    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("invoice_number", Some(self.invoice_number.clone())),
            ("invoice_type_id", text(&self.invoice_type_id)),
            ("invoice_status_id", text(&self.invoice_status_id)),
            ("customer_id", Some(self.customer_id.to_string())),
            ("project_id", text(&self.project_id)),
            ("invoice_date", Some(self.invoice_date.to_string())),
            ("due_date", text(&self.due_date)),
            ("subtotal", Some(self.subtotal.to_string())),
            ("tax_amount", Some(self.tax_amount.to_string())),
            ("total_amount", Some(self.total_amount.to_string())),
            ("notes", self.notes.clone()),
        ]
    }
}

/// Invoice con cliente, tipo, estado y proyecto resueltos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invoice: Invoice,
    pub company_name: Option<String>,
    pub customer_rfc: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub invoice_type_name: Option<String>,
    pub status_name: Option<String>,
    pub status_alias: Option<String>,
    pub project_name: Option<String>,
    pub project_number: Option<String>,
    pub created_by_name: Option<String>,
    pub modified_by_name: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct InvoiceStats {
    pub total_invoices: i64,
    pub paid_invoices: i64,
    pub pending_invoices: i64,
    pub overdue_invoices: i64,
    pub cancelled_invoices: i64,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub overdue_amount: Decimal,
    pub average_invoice_amount: Decimal,
}
