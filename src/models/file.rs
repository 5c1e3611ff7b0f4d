//! Archivos adjuntos a cualquier entidad (section_id + foreign_id)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FileRecord {
    pub id: i32,
    pub section_id: i32,
    pub foreign_id: i32,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: Option<String>,
    pub file_description: Option<String>,
    pub uploaded_by: Option<i32>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FileDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub file: FileRecord,
    pub uploaded_by_name: Option<String>,
}
