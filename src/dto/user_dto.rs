use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::common_dto::deserialize_flag;
use crate::models::user::{RoleUserCount, UserTotals};

// Request para crear un usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub person_id: Option<i32>,
    pub role_id: Option<i32>,
    #[validate(email)]
    pub email: Option<String>,
    pub usr_password: Option<String>,
    pub username: Option<String>,
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub usr_active: Option<bool>,
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_generic: Option<bool>,
}

// Request para actualizar un usuario (merge parcial)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub person_id: Option<i32>,
    pub role_id: Option<i32>,
    #[validate(email)]
    pub email: Option<String>,
    pub username: Option<String>,
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub usr_active: Option<bool>,
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_generic: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    #[serde(flatten)]
    pub totals: UserTotals,
    pub by_role: Vec<RoleUserCount>,
}
