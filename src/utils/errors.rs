//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP con el sobre `{success: false, ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Detalles crudos en las respuestas de error; apagado hasta que la
/// configuración cargada indique desarrollo
static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Activar o desactivar los detalles de error según el entorno cargado
pub fn expose_error_details(enabled: bool) {
    EXPOSE_DETAILS.store(enabled, Ordering::Relaxed);
}

fn exposing_details() -> bool {
    EXPOSE_DETAILS.load(Ordering::Relaxed)
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Clasificación de un error de base de datos
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbErrorKind {
    Duplicate,
    ReferencedByOthers,
    InvalidReference,
    Other,
}

impl DbErrorKind {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DbErrorKind::Duplicate => Some("Duplicate entry. Record already exists."),
            DbErrorKind::ReferencedByOthers => {
                Some("Cannot delete record. It is referenced by other records.")
            }
            DbErrorKind::InvalidReference => Some("Invalid reference. Related record does not exist."),
            DbErrorKind::Other => None,
        }
    }
}

/// Clasificar un error de PostgreSQL por SQLSTATE y mensaje
///
/// 23505 es violación de unicidad; 23503 es violación de llave foránea, que
/// PostgreSQL reporta como "update or delete on table ..." cuando se toca al
/// padre y como "insert or update on table ..." cuando el hijo apunta a nada.
pub fn classify_db_error(code: Option<&str>, message: &str) -> DbErrorKind {
    match code {
        Some("23505") => DbErrorKind::Duplicate,
        Some("23503") if message.starts_with("update or delete") => DbErrorKind::ReferencedByOthers,
        Some("23503") => DbErrorKind::InvalidReference,
        _ => DbErrorKind::Other,
    }
}

fn details(value: serde_json::Value) -> Option<serde_json::Value> {
    if exposing_details() {
        Some(value)
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    success: false,
                    message: "Record not found".to_string(),
                    error: "NOT_FOUND",
                    details: None,
                },
            ),

            AppError::Database(e) => {
                let (code, raw) = match &e {
                    sqlx::Error::Database(db) => (db.code().map(|c| c.to_string()), db.message().to_string()),
                    other => (None, other.to_string()),
                };

                match classify_db_error(code.as_deref(), &raw).message() {
                    Some(message) => {
                        warn!("⚠️ Violación de integridad: {}", raw);
                        (
                            StatusCode::BAD_REQUEST,
                            ErrorResponse {
                                success: false,
                                message: message.to_string(),
                                error: "DB_CONSTRAINT",
                                details: details(json!({ "sql_error": raw })),
                            },
                        )
                    }
                    None => {
                        error!("❌ Database error: {}", e);
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorResponse {
                                success: false,
                                message: if exposing_details() {
                                    raw.clone()
                                } else {
                                    "An error occurred while accessing the database".to_string()
                                },
                                error: "DB_ERROR",
                                details: details(json!({ "sql_error": raw })),
                            },
                        )
                    }
                }
            }

            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    message: "Validation failed".to_string(),
                    error: "VALIDATION_ERROR",
                    details: Some(json!(e)),
                },
            ),

            AppError::Unauthorized(msg) => {
                warn!("🔒 Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        success: false,
                        message: msg,
                        error: "UNAUTHORIZED",
                        details: None,
                    },
                )
            }

            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    success: false,
                    message: msg,
                    error: "FORBIDDEN",
                    details: None,
                },
            ),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    success: false,
                    message: msg,
                    error: "NOT_FOUND",
                    details: None,
                },
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    success: false,
                    message: msg,
                    error: "CONFLICT",
                    details: None,
                },
            ),

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    message: msg,
                    error: "BAD_REQUEST",
                    details: None,
                },
            ),

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success: false,
                        message: "An unexpected error occurred".to_string(),
                        error: "INTERNAL_ERROR",
                        details: details(json!({ "internal_error": msg })),
                    },
                )
            }

            AppError::Hash(msg) => {
                error!("❌ Hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success: false,
                        message: "An error occurred while processing credentials".to_string(),
                        error: "HASH_ERROR",
                        details: details(json!({ "hash_error": msg })),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Hash(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// `<Entity> not found`
pub fn not_found_error(entity: &str) -> AppError {
    AppError::NotFound(format!("{} not found", entity))
}

/// `<Entity> not found or already deleted`, para updates y soft deletes sin filas afectadas
pub fn not_found_or_deleted(entity: &str) -> AppError {
    AppError::NotFound(format!("{} not found or already deleted", entity))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_unique_violation_is_duplicate() {
        let kind = classify_db_error(Some("23505"), "duplicate key value violates unique constraint");
        assert_eq!(kind, DbErrorKind::Duplicate);
        assert_eq!(kind.message(), Some("Duplicate entry. Record already exists."));
    }

    #[test]
    fn test_foreign_key_on_parent_delete() {
        let kind = classify_db_error(
            Some("23503"),
            "update or delete on table \"customers\" violates foreign key constraint",
        );
        assert_eq!(kind, DbErrorKind::ReferencedByOthers);
    }

    #[test]
    fn test_foreign_key_on_child_insert() {
        let kind = classify_db_error(
            Some("23503"),
            "insert or update on table \"invoices\" violates foreign key constraint",
        );
        assert_eq!(kind, DbErrorKind::InvalidReference);
        assert_eq!(kind.message(), Some("Invalid reference. Related record does not exist."));
    }

    #[test]
    fn test_other_codes_are_unclassified() {
        assert_eq!(classify_db_error(Some("42P01"), "relation does not exist"), DbErrorKind::Other);
        assert_eq!(classify_db_error(None, "pool timed out"), DbErrorKind::Other);
        assert_eq!(DbErrorKind::Other.message(), None);
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = AppError::NotFound("Customer not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Customer not found");
        assert_eq!(value["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details_by_default() {
        let response = AppError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "An unexpected error occurred");
        assert!(value.get("details").is_none());
    }

    #[tokio::test]
    async fn test_row_not_found_maps_to_404() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
