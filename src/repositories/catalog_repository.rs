//! Acceso dinámico a tablas de catálogo
//!
//! La tabla siempre proviene de la lista fija de catálogos y las columnas de
//! `information_schema`, así que los identificadores interpolados nunca vienen
//! del cliente. Los valores se convierten con `json_populate_record`.

use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::utils::errors::AppError;

pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Columnas editables (todas menos `id`)
    pub async fn columns(&self, table: &str) -> Result<Vec<String>, AppError> {
        let columns: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT column_name::text
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1 AND column_name <> 'id'
            ORDER BY ordinal_position
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;
        Ok(columns)
    }

    pub async fn list(&self, table: &str) -> Result<Value, AppError> {
        let sql = format!("SELECT COALESCE(json_agg(t ORDER BY t.id), '[]'::json) FROM {} t", table);
        let entries: Value = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(entries)
    }

    pub async fn find_by_id(&self, table: &str, id: i32) -> Result<Option<Value>, AppError> {
        let sql = format!("SELECT row_to_json(t) FROM {} t WHERE t.id = $1", table);
        let entry: Option<Value> = sqlx::query_scalar(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(entry)
    }

    pub async fn insert(&self, table: &str, columns: &[String], values: &Map<String, Value>) -> Result<Value, AppError> {
        let column_list = quoted(columns).join(", ");
        let source_list = columns
            .iter()
            .map(|c| format!("r.\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {table} AS t ({column_list}) \
             SELECT {source_list} FROM json_populate_record(NULL::{table}, $1) r \
             RETURNING row_to_json(t)",
        );
        let entry: Value = sqlx::query_scalar(&sql)
            .bind(Value::Object(values.clone()))
            .fetch_one(&self.pool)
            .await?;
        Ok(entry)
    }

    pub async fn update(
        &self,
        table: &str,
        id: i32,
        columns: &[String],
        values: &Map<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let assignments = columns
            .iter()
            .map(|c| format!("\"{c}\" = r.\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {table} AS t SET {assignments} \
             FROM json_populate_record(NULL::{table}, $2) r \
             WHERE t.id = $1 \
             RETURNING row_to_json(t)",
        );
        let entry: Option<Value> = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(Value::Object(values.clone()))
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    pub async fn delete(&self, table: &str, id: i32) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn quoted(columns: &[String]) -> Vec<String> {
    columns.iter().map(|c| format!("\"{}\"", c)).collect()
}
