use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{blank_as_none, validate_non_negative_decimal};

// Sin `material_code` se genera `MAT-NNNNNN`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 1, max = 50))]
    pub material_code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub material_name: Option<String>,
    pub category_id: Option<i32>,
    pub unit_of_measure_id: Option<i32>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub unit_cost: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub minimum_stock: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub current_stock: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub reorder_point: Option<Decimal>,
    pub description: Option<String>,
}

// `current_stock` no se edita aquí: solo cambia por movimientos de almacén
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMaterialRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 1, max = 50))]
    pub material_code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub material_name: Option<String>,
    pub category_id: Option<i32>,
    pub unit_of_measure_id: Option<i32>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub unit_cost: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub minimum_stock: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub reorder_point: Option<Decimal>,
    pub description: Option<String>,
}
