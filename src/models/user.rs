//! Modelo de User
//!
//! Mapea la tabla `users`; el hash de la contraseña nunca se serializa.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub person_id: i32,
    pub role_id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub usr_password: String,
    pub username: String,
    pub lastname: String,
    pub usr_active: bool,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_generic: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Usuario con rol y datos de la persona
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserDetail {
    pub id: i32,
    pub person_id: i32,
    pub role_id: i32,
    pub email: String,
    pub username: String,
    pub lastname: String,
    pub usr_active: bool,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_generic: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub role_name: Option<String>,
    pub person_names: Option<String>,
    pub last_name1: Option<String>,
    pub last_name2: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserTotals {
    pub total_users: i64,
    pub active_users: i64,
    pub inactive_users: i64,
    pub generic_users: i64,
    pub new_this_month: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct RoleUserCount {
    pub role_name: String,
    pub user_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: 1,
            person_id: 1,
            role_id: 1,
            email: "admin@erp.com".to_string(),
            usr_password: "$2b$12$hash".to_string(),
            username: "Admin".to_string(),
            lastname: "System".to_string(),
            usr_active: true,
            expiration_date: None,
            is_generic: false,
            created: now,
            modified: now,
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("usr_password").is_none());
        assert_eq!(value["email"], "admin@erp.com");
    }
}
