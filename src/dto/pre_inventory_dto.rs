use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::dto::common_dto::deserialize_flag;
use crate::utils::validation::validate_non_negative_decimal;

#[derive(Debug, Deserialize)]
pub struct CreatePreInventoryRequest {
    pub material_id: Option<i32>,
    pub warehouse_location_id: Option<i32>,
    pub count_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCountRequest {
    #[validate(custom = "validate_non_negative_decimal")]
    pub counted_quantity: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreInventoryFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub material_id: Option<i32>,
    pub location_id: Option<i32>,
    pub status_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub adjusted: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyQuery {
    pub location_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub only_discrepancies: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_count_fails_validation() {
        let request: UpdateCountRequest = serde_json::from_str(r#"{"counted_quantity": -1}"#).unwrap();
        assert!(request.validate().is_err());
        let request: UpdateCountRequest = serde_json::from_str(r#"{"counted_quantity": "0"}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_filter_uses_camel_case_keys() {
        let filter: PreInventoryFilter =
            serde_json::from_str(r#"{"materialId": 4, "locationId": 2, "adjusted": "true"}"#).unwrap();
        assert_eq!(filter.material_id, Some(4));
        assert_eq!(filter.location_id, Some(2));
        assert_eq!(filter.adjusted, Some(true));
    }
}
