//! Modelo de Customer

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Customer - mapea exactamente a la tabla customers
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: i32,
    pub company_name: String,
    pub rfc: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state_id: Option<i32>,
    pub postal_code: Option<String>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Customer con estado y creador resueltos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: Customer,
    pub state_name: Option<String>,
    pub created_by_name: Option<String>,
}
