use serde::Deserialize;
use validator::Validate;

// Request para crear un cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: Option<String>,
    #[validate(length(max = 13))]
    pub rfc: Option<String>,
    pub contact_name: Option<String>,
    #[validate(length(max = 15))]
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state_id: Option<i32>,
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
}

// Request para actualizar un cliente; los campos ausentes se conservan
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: Option<String>,
    #[validate(length(max = 13))]
    pub rfc: Option<String>,
    pub contact_name: Option<String>,
    #[validate(length(max = 15))]
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state_id: Option<i32>,
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
}
