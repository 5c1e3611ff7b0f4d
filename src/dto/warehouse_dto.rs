use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::dto::common_dto::deserialize_flag;

#[derive(Debug, Deserialize, Validate)]
pub struct TransferRequest {
    pub material_id: Option<i32>,
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    pub quantity: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
    pub transfer_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdjustInventoryRequest {
    pub material_id: Option<i32>,
    pub warehouse_location_id: Option<i32>,
    pub quantity: Option<Decimal>,
    /// `entry`, `exit` o `adjustment`
    pub transaction_type: Option<String>,
    #[validate(length(max = 100))]
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockSearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub material_id: Option<i32>,
    pub location_id: Option<i32>,
    pub transaction_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub material_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReportQuery {
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub low_stock: Option<bool>,
}
