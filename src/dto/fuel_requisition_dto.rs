use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{blank_as_none, validate_non_negative_decimal, validate_positive_decimal};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFuelRequisitionRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 1, max = 50))]
    pub requisition_code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub vehicle_equipment_name: Option<String>,
    pub project_id: Option<i32>,
    pub requisition_date: Option<NaiveDate>,
    pub fuel_type: Option<String>,
    #[validate(custom = "validate_positive_decimal")]
    pub quantity_liters: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub unit_price: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub total_amount: Option<Decimal>,
    pub odometer_reading: Option<Decimal>,
    pub notes: Option<String>,
}

impl CreateFuelRequisitionRequest {
    /// Total explícito o litros × precio
    pub fn total_amount(&self) -> Decimal {
        match self.total_amount {
            Some(total) => total,
            None => fuel_total(
                self.quantity_liters.unwrap_or_default(),
                self.unit_price.unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFuelRequisitionRequest {
    #[validate(length(min = 1, max = 255))]
    pub vehicle_equipment_name: Option<String>,
    pub project_id: Option<i32>,
    pub requisition_date: Option<NaiveDate>,
    pub fuel_type: Option<String>,
    #[validate(custom = "validate_positive_decimal")]
    pub quantity_liters: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub unit_price: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub total_amount: Option<Decimal>,
    pub odometer_reading: Option<Decimal>,
    pub notes: Option<String>,
}

impl UpdateFuelRequisitionRequest {
    pub fn changes_total_basis(&self) -> bool {
        self.quantity_liters.is_some() || self.unit_price.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequisitionStatusRequest {
    pub requisition_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FuelRequisitionFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub project_id: Option<i32>,
    pub requisition_status: Option<String>,
    pub fuel_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConsumptionQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub fuel_type: Option<String>,
    pub project_id: Option<i32>,
}

pub fn fuel_total(liters: Decimal, unit_price: Decimal) -> Decimal {
    (liters * unit_price).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_defaults_to_liters_times_price() {
        let request: CreateFuelRequisitionRequest = serde_json::from_str(
            r#"{"vehicle_equipment_name": "Excavadora 3", "fuel_type": "diesel", "quantity_liters": "120.5", "unit_price": "23.10"}"#,
        )
        .unwrap();
        assert_eq!(request.total_amount(), Decimal::new(278355, 2));
    }

    #[test]
    fn test_zero_liters_fails_validation() {
        let request: CreateFuelRequisitionRequest =
            serde_json::from_str(r#"{"quantity_liters": 0, "unit_price": 20}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_code_is_treated_as_absent() {
        let request: CreateFuelRequisitionRequest = serde_json::from_str(
            r#"{"requisition_code": "", "vehicle_equipment_name": "Grúa 2", "fuel_type": "gasoline", "quantity_liters": 10, "unit_price": 22}"#,
        )
        .unwrap();
        assert_eq!(request.requisition_code, None);
        assert!(request.validate().is_ok());
    }
}
