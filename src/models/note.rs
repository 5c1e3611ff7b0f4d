use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: i32,
    pub section_id: i32,
    pub foreign_id: i32,
    pub note_text: String,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NoteDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub note: Note,
    pub created_by_name: Option<String>,
    pub modified_by_name: Option<String>,
}
