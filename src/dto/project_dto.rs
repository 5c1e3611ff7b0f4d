use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{blank_as_none, validate_non_negative_decimal};

// Sin `project_number` se genera `PRJ-NNNNNN`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 1, max = 50))]
    pub project_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub project_name: Option<String>,
    pub customer_id: Option<i32>,
    pub project_type_id: Option<i32>,
    pub project_area_id: Option<i32>,
    pub project_status_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub total_budget: Option<Decimal>,
    pub location_address: Option<String>,
    #[validate(length(max = 100))]
    pub location_city: Option<String>,
    pub location_state_id: Option<i32>,
    pub project_manager_id: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 1, max = 50))]
    pub project_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub project_name: Option<String>,
    pub customer_id: Option<i32>,
    pub project_type_id: Option<i32>,
    pub project_area_id: Option<i32>,
    pub project_status_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub total_budget: Option<Decimal>,
    pub location_address: Option<String>,
    #[validate(length(max = 100))]
    pub location_city: Option<String>,
    pub location_state_id: Option<i32>,
    pub project_manager_id: Option<i32>,
    pub description: Option<String>,
}
