//! Utilidades JWT
//!
//! Emisión y verificación de tokens HS256 con los claims del usuario ERP.

use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    pub user_id: i32,
    pub email: String,
    pub role_id: i32,
    pub person_id: Option<i32>,
    pub iat: usize,
    pub exp: usize,
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: i32,
    email: &str,
    role_id: i32,
    person_id: Option<i32>,
    config: &JwtConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = JwtClaims {
        user_id,
        email: email.to_string(),
        role_id,
        person_id,
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(config.secret.as_ref()))
        .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar JWT token
///
/// Un token vencido se distingue del resto de fallos para que el cliente
/// sepa que debe volver a iniciar sesión.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired. Please login again.".to_string())
        }
        _ => AppError::Unauthorized("Invalid token.".to_string()),
    })
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Unauthorized(msg) => msg,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = generate_token(7, "admin@erp.com", 1, Some(3), &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "admin@erp.com");
        assert_eq!(claims.role_id, 1);
        assert_eq!(claims.person_id, Some(3));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_are_camel_case() {
        let claims = JwtClaims {
            user_id: 1,
            email: "a@b.com".to_string(),
            role_id: 2,
            person_id: None,
            iat: 0,
            exp: 1,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("roleId").is_some());
        assert!(value.get("personId").is_some());
    }

    #[test]
    fn test_expired_token_is_reported() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = JwtClaims {
            user_id: 1,
            email: "a@b.com".to_string(),
            role_id: 1,
            person_id: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap();

        let err = verify_token(&token, &config()).unwrap_err();
        assert_eq!(message(err), "Token expired. Please login again.");
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = generate_token(1, "a@b.com", 1, None, &config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            expiration: 3600,
        };

        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(message(err), "Invalid token.");
    }

    #[test]
    fn test_garbage_is_invalid() {
        let err = verify_token("not-a-jwt", &config()).unwrap_err();
        assert_eq!(message(err), "Invalid token.");
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token_from_header("Bearer "), None);
        assert_eq!(extract_token_from_header("Basic dXNlcjpwYXNz"), None);
    }
}
