//! Sobres de respuesta y queries compartidos por todos los módulos

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::pagination::{PageParams, Pagination};
use crate::utils::validation::parse_date_filter;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Respuesta sin `data`, solo mensaje
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PageParams, total_items: i64) -> Self {
        Self {
            success: true,
            data,
            pagination: params.pagination(total_items),
        }
    }
}

/// Periodo obligatorio de los reportes por rango de fechas
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReportPeriod {
    pub fn required(start_date: Option<&str>, end_date: Option<&str>) -> Result<Self, AppError> {
        let start = parse_date_filter("start_date", start_date)?;
        let end = parse_date_filter("end_date", end_date)?;
        match (start, end) {
            (Some(start_date), Some(end_date)) => Ok(Self { start_date, end_date }),
            _ => Err(bad_request_error("Start date and end date are required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PeriodResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub period: ReportPeriod,
}

impl<T> PeriodResponse<T> {
    pub fn new(data: Vec<T>, period: ReportPeriod) -> Self {
        Self {
            success: true,
            data,
            period,
        }
    }
}

/// Query base de listados: `?page&limit&search`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page_params(&self, default_limit: i64) -> PageParams {
        PageParams::new(self.page, self.limit, default_limit)
    }

    /// Término de búsqueda como patrón ILIKE, `None` si viene vacío
    pub fn search_pattern(&self) -> Option<String> {
        search_pattern(self.search.as_deref())
    }
}

pub fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Booleano que también acepta `0`/`1` y `"true"`/`"false"`
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = Option::<FlagRepr>::deserialize(deserializer)?;
    Ok(match flag {
        None => None,
        Some(FlagRepr::Bool(b)) => Some(b),
        Some(FlagRepr::Int(i)) => Some(i != 0),
        Some(FlagRepr::Text(t)) => match t.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_omits_data() {
        let value = serde_json::to_value(ApiResponse::message("Customer deleted successfully")).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Customer deleted successfully");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_paginated_response() {
        let params = PageParams::new(Some(1), Some(10), 10);
        let value = serde_json::to_value(PaginatedResponse::new(vec![1, 2, 3], &params, 23)).unwrap();
        assert_eq!(value["data"].as_array().map(|a| a.len()), Some(3));
        assert_eq!(value["pagination"]["totalPages"], 3);
    }

    #[derive(Deserialize)]
    struct Flagged {
        #[serde(default, deserialize_with = "deserialize_flag")]
        active: Option<bool>,
    }

    #[test]
    fn test_deserialize_flag() {
        let parse = |s: &str| serde_json::from_str::<Flagged>(s).unwrap().active;
        assert_eq!(parse(r#"{"active": true}"#), Some(true));
        assert_eq!(parse(r#"{"active": 0}"#), Some(false));
        assert_eq!(parse(r#"{"active": "1"}"#), Some(true));
        assert_eq!(parse(r#"{}"#), None);
    }

    #[test]
    fn test_report_period_requires_both_dates() {
        assert!(ReportPeriod::required(Some("2024-01-01"), Some("2024-01-31")).is_ok());
        assert!(matches!(
            ReportPeriod::required(Some("2024-01-01"), None),
            Err(AppError::BadRequest(message)) if message == "Start date and end date are required"
        ));
    }

    #[test]
    fn test_search_pattern() {
        assert_eq!(search_pattern(Some(" acme ")), Some("%acme%".to_string()));
        assert_eq!(search_pattern(Some("")), None);
        assert_eq!(search_pattern(None), None);
    }
}
