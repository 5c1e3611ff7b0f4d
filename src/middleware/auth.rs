//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role_id: i32,
    pub person_id: Option<i32>,
}

#[derive(sqlx::FromRow)]
struct UserAccessRow {
    id: i32,
    email: String,
    role_id: i32,
    person_id: i32,
    usr_active: bool,
    expiration_date: Option<DateTime<Utc>>,
}

/// Middleware de autenticación JWT
///
/// Además de la firma se consulta el usuario en cada request: una cuenta
/// desactivada o vencida deja de funcionar aunque su token siga vigente.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_token_from_header)
        .ok_or_else(|| AppError::Unauthorized("Access denied. No token provided.".to_string()))?;

    let claims = verify_token(token, &state.jwt_config())?;

    let user = sqlx::query_as::<_, UserAccessRow>(
        r#"
        SELECT id, email, role_id, person_id, usr_active, expiration_date
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("User no longer exists.".to_string()))?;

    check_account(user.usr_active, user.expiration_date, Utc::now())?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        role_id: user.role_id,
        person_id: Some(user.person_id),
    });

    Ok(next.run(request).await)
}

/// Estado de la cuenta: activa y sin fecha de expiración vencida
pub fn check_account(
    active: bool,
    expiration_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if !active {
        return Err(AppError::Unauthorized("User account is inactive.".to_string()));
    }
    if matches!(expiration_date, Some(expires) if expires < now) {
        return Err(AppError::Unauthorized("User account has expired.".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_active_account_without_expiration() {
        assert!(check_account(true, None, Utc::now()).is_ok());
    }

    #[test]
    fn test_inactive_account() {
        match check_account(false, None, Utc::now()) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "User account is inactive."),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_expired_account() {
        let now = Utc::now();
        match check_account(true, Some(now - Duration::days(1)), now) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "User account has expired."),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(check_account(true, Some(now + Duration::days(1)), now).is_ok());
    }
}
