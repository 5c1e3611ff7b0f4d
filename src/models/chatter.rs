//! Publicaciones del chatter asociadas a cualquier entidad (section_id + foreign_id)

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatterPost {
    pub id: i32,
    pub section_id: i32,
    pub foreign_id: i32,
    pub post_text: String,
    pub mentions: Value,
    pub parent_id: Option<i32>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatterPostDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: ChatterPost,
    pub created_by_name: Option<String>,
    pub created_by_full_name: Option<String>,
    pub created_by_photo: Option<String>,
    pub replies_count: i64,
}

/// Usuario sugerido para menciones
#[derive(Debug, Serialize, FromRow)]
pub struct MentionCandidate {
    pub id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub photo_url: Option<String>,
}
