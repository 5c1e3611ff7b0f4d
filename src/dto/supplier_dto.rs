use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub supplier_name: Option<String>,
    pub supplier_category_id: Option<i32>,
    #[validate(length(max = 255))]
    pub contact_name: Option<String>,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub payment_terms: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub supplier_name: Option<String>,
    pub supplier_category_id: Option<i32>,
    #[validate(length(max = 255))]
    pub contact_name: Option<String>,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub payment_terms: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupplierFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category_id: Option<i32>,
}
