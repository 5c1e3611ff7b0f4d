use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::info;

use crate::models::catalog::{all_catalogs, catalog_table, CatalogInfo};
use crate::repositories::catalog_repository::CatalogRepository;
use crate::utils::errors::{bad_request_error, AppError};

pub struct CatalogController {
    repository: CatalogRepository,
}

impl CatalogController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CatalogRepository::new(pool),
        }
    }

    pub fn catalogs(&self) -> Vec<CatalogInfo> {
        all_catalogs()
    }

    pub async fn entries(&self, catalog: &str) -> Result<Value, AppError> {
        let table = resolve(catalog)?;
        self.repository.list(table).await
    }

    pub async fn entry(&self, catalog: &str, id: i32) -> Result<Value, AppError> {
        let table = resolve(catalog)?;
        self.repository
            .find_by_id(table, id)
            .await?
            .ok_or_else(entry_not_found)
    }

    pub async fn create(&self, catalog: &str, body: Map<String, Value>) -> Result<Value, AppError> {
        let table = resolve(catalog)?;
        let (columns, values) = self.writable_fields(table, body).await?;
        let entry = self.repository.insert(table, &columns, &values).await?;
        info!("🗂️ Entrada creada en catálogo {}", catalog);
        Ok(entry)
    }

    pub async fn update(&self, catalog: &str, id: i32, body: Map<String, Value>) -> Result<Value, AppError> {
        let table = resolve(catalog)?;
        let (columns, values) = self.writable_fields(table, body).await?;
        self.repository
            .update(table, id, &columns, &values)
            .await?
            .ok_or_else(entry_not_found)
    }

    pub async fn delete(&self, catalog: &str, id: i32) -> Result<(), AppError> {
        let table = resolve(catalog)?;
        if !self.repository.delete(table, id).await? {
            return Err(entry_not_found());
        }
        info!("🗑️ Entrada {} eliminada del catálogo {}", id, catalog);
        Ok(())
    }

    /// Conserva solo las llaves que son columnas reales de la tabla
    async fn writable_fields(
        &self,
        table: &str,
        body: Map<String, Value>,
    ) -> Result<(Vec<String>, Map<String, Value>), AppError> {
        let known = self.repository.columns(table).await?;
        let values = retain_columns(body, &known);
        if values.is_empty() {
            return Err(bad_request_error("No valid fields provided"));
        }
        let columns = known.into_iter().filter(|c| values.contains_key(c)).collect();
        Ok((columns, values))
    }
}

fn resolve(catalog: &str) -> Result<&'static str, AppError> {
    catalog_table(catalog).ok_or_else(|| AppError::NotFound(format!("Catalog '{}' not found", catalog)))
}

fn entry_not_found() -> AppError {
    AppError::NotFound("Catalog entry not found".to_string())
}

fn retain_columns(body: Map<String, Value>, columns: &[String]) -> Map<String, Value> {
    body.into_iter()
        .filter(|(key, _)| columns.iter().any(|c| c == key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_retain_columns_drops_unknown_and_id() {
        let body = json!({"id": 99, "name": "Tons", "alias": "t", "is_admin": true});
        let columns = vec!["name".to_string(), "alias".to_string(), "description".to_string()];
        let kept = retain_columns(body.as_object().cloned().unwrap_or_default(), &columns);
        assert_eq!(kept.len(), 2);
        assert!(kept.contains_key("name"));
        assert!(!kept.contains_key("id"));
    }

    #[test]
    fn test_unknown_catalog_is_not_found() {
        let err = resolve("payroll").unwrap_err();
        assert!(matches!(err, AppError::NotFound(message) if message == "Catalog 'payroll' not found"));
    }
}
