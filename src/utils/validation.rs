//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidationError;

use crate::utils::errors::AppError;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validador de `validator` para cantidades que deben ser > 0
pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)
}

/// Validador de `validator` para cantidades que deben ser >= 0
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Parsear un filtro de fecha opcional de query string (`YYYY-MM-DD`)
pub fn parse_date_filter(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => validate_date(raw)
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {}. Expected YYYY-MM-DD", field))),
    }
}

/// Exigir un campo de texto no vacío
pub fn require_text<'a>(value: Option<&'a str>) -> Option<&'a str> {
    value.map(str::trim).filter(|v| validate_not_empty(v).is_ok())
}

/// `deserialize_with` para textos opcionales: `""` o sólo espacios cuentan como ausente
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
        assert!(validate_positive_decimal(&Decimal::new(1, 2)).is_ok());
        assert!(validate_positive_decimal(&Decimal::ZERO).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative_decimal(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_decimal(&Decimal::new(-15, 1)).is_err());
    }

    #[test]
    fn test_parse_date_filter() {
        assert_eq!(parse_date_filter("start_date", None).unwrap(), None);
        assert_eq!(parse_date_filter("start_date", Some("  ")).unwrap(), None);
        assert_eq!(
            parse_date_filter("start_date", Some("2024-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(parse_date_filter("start_date", Some("03/01/2024")).is_err());
    }

    #[test]
    fn test_blank_as_none() {
        #[derive(Deserialize)]
        struct Coded {
            #[serde(default, deserialize_with = "blank_as_none")]
            code: Option<String>,
        }

        let parse = |s: &str| serde_json::from_str::<Coded>(s).unwrap().code;
        assert_eq!(parse(r#"{"code": ""}"#), None);
        assert_eq!(parse(r#"{"code": "   "}"#), None);
        assert_eq!(parse(r#"{"code": null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"code": " FR-000010 "}"#), Some("FR-000010".to_string()));
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some("  Acme ")), Some("Acme"));
        assert_eq!(require_text(Some("   ")), None);
        assert_eq!(require_text(None), None);
    }
}
