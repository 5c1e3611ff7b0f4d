use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{blank_as_none, validate_non_negative_decimal};

// Request para crear una factura; sin `invoice_number` se genera `INV-NNNNNN`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 1, max = 50))]
    pub invoice_number: Option<String>,
    pub invoice_type_id: Option<i32>,
    pub invoice_status_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub project_id: Option<i32>,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub subtotal: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub tax_amount: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub total_amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl CreateInvoiceRequest {
    /// `total_amount` explícito o subtotal + impuestos
    pub fn amounts(&self) -> (Decimal, Decimal, Decimal) {
        let subtotal = self.subtotal.unwrap_or_default();
        let tax = self.tax_amount.unwrap_or_default();
        let total = self.total_amount.unwrap_or(subtotal + tax);
        (subtotal, tax, total)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 1, max = 50))]
    pub invoice_number: Option<String>,
    pub invoice_type_id: Option<i32>,
    pub invoice_status_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub project_id: Option<i32>,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub subtotal: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub tax_amount: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub total_amount: Option<Decimal>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_defaults_to_subtotal_plus_tax() {
        let request: CreateInvoiceRequest =
            serde_json::from_str(r#"{"customer_id": 1, "subtotal": "100.00", "tax_amount": "16.00"}"#).unwrap();
        let (subtotal, tax, total) = request.amounts();
        assert_eq!(subtotal, Decimal::new(10000, 2));
        assert_eq!(tax, Decimal::new(1600, 2));
        assert_eq!(total, Decimal::new(11600, 2));
    }

    #[test]
    fn test_explicit_total_is_kept() {
        let request: CreateInvoiceRequest =
            serde_json::from_str(r#"{"subtotal": 100, "tax_amount": 16, "total_amount": 110}"#).unwrap();
        assert_eq!(request.amounts().2, Decimal::new(110, 0));
    }

    #[test]
    fn test_negative_amount_fails_validation() {
        let request: CreateInvoiceRequest = serde_json::from_str(r#"{"subtotal": -5}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
