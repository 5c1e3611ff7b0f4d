//! Historial de una entidad
//!
//! Combina chatter, notas y archivos de `(section_id, foreign_id)` en una sola
//! línea de tiempo, del evento más reciente al más antiguo.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::dto::common_dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};

/// Entidades con historial y la columna que las identifica
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySection {
    Invoices,
    Projects,
    Customers,
    PurchaseOrders,
    Materials,
    Suppliers,
    PreInventory,
    FuelRequisitions,
}

impl HistorySection {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Invoices),
            2 => Some(Self::Projects),
            3 => Some(Self::Customers),
            4 => Some(Self::PurchaseOrders),
            5 => Some(Self::Materials),
            6 => Some(Self::Suppliers),
            7 => Some(Self::PreInventory),
            8 => Some(Self::FuelRequisitions),
            _ => None,
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Self::Invoices => "invoices",
            Self::Projects => "projects",
            Self::Customers => "customers",
            Self::PurchaseOrders => "purchase_orders",
            Self::Materials => "materials",
            Self::Suppliers => "suppliers",
            Self::PreInventory => "pre_inventory",
            Self::FuelRequisitions => "fuel_requisitions",
        }
    }

    pub fn label_column(&self) -> &'static str {
        match self {
            Self::Invoices => "invoice_number",
            Self::Projects => "project_number",
            Self::Customers => "company_name",
            Self::PurchaseOrders => "po_number",
            Self::Materials => "material_code",
            Self::Suppliers => "supplier_name",
            Self::PreInventory => "pre_inventory_number",
            Self::FuelRequisitions => "requisition_code",
        }
    }

    fn parse(section_id: i32) -> AppResult<Self> {
        Self::from_id(section_id).ok_or_else(|| bad_request_error("Invalid section_id"))
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HistoryEvent {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub event_type: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_full_name: Option<String>,
    pub user_photo: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub field_name: Option<String>,
}

const USER_COLUMNS: &str = r#"
    u.username AS user_name,
    CONCAT_WS(' ', p.person_names, p.last_name1) AS user_full_name,
    p.photo_url AS user_photo
"#;

pub fn create_history_router() -> Router<AppState> {
    Router::new()
        .route("/:section_id/:foreign_id", get(get_entity_history))
        .route("/:section_id/:foreign_id/status", get(get_status_history))
}

async fn get_entity_history(
    State(state): State<AppState>,
    Path((section_id, foreign_id)): Path<(i32, i32)>,
) -> AppResult<Json<ApiResponse<Vec<HistoryEvent>>>> {
    HistorySection::parse(section_id)?;
    let pool = &state.pool;

    let (posts, notes, files) = futures::try_join!(
        chatter_events(pool, section_id, foreign_id),
        note_events(pool, section_id, foreign_id),
        file_events(pool, section_id, foreign_id),
    )?;

    Ok(Json(ApiResponse::success(merge_timeline(vec![posts, notes, files]))))
}

async fn get_status_history(
    State(state): State<AppState>,
    Path((section_id, foreign_id)): Path<(i32, i32)>,
) -> AppResult<Json<ApiResponse<Vec<HistoryEvent>>>> {
    let section = HistorySection::parse(section_id)?;
    let creation = creation_event(&state.pool, section, foreign_id).await?;
    Ok(Json(ApiResponse::success(creation.into_iter().collect())))
}

/// Une las fuentes y ordena por fecha descendente
pub fn merge_timeline(sources: Vec<Vec<HistoryEvent>>) -> Vec<HistoryEvent> {
    let mut events: Vec<HistoryEvent> = sources.into_iter().flatten().collect();
    events.sort_by(|a, b| b.event_date.cmp(&a.event_date));
    events
}

async fn chatter_events(pool: &PgPool, section_id: i32, foreign_id: i32) -> AppResult<Vec<HistoryEvent>> {
    let sql = format!(
        r#"
        SELECT
            cp.id,
            'chatter' AS type,
            cp.post_text AS description,
            cp.created_date AS event_date,
            {USER_COLUMNS},
            NULL::text AS old_value,
            NULL::text AS new_value,
            NULL::text AS field_name
        FROM chatter_posts cp
        LEFT JOIN users u ON cp.created_by = u.id
        LEFT JOIN people p ON u.person_id = p.id
        WHERE cp.section_id = $1 AND cp.foreign_id = $2
          AND cp.is_active = TRUE AND cp.parent_id IS NULL
        "#
    );
    fetch_events(pool, &sql, section_id, foreign_id).await
}

async fn note_events(pool: &PgPool, section_id: i32, foreign_id: i32) -> AppResult<Vec<HistoryEvent>> {
    let sql = format!(
        r#"
        SELECT
            n.id,
            'note' AS type,
            n.note_text AS description,
            n.created_date AS event_date,
            {USER_COLUMNS},
            NULL::text AS old_value,
            NULL::text AS new_value,
            NULL::text AS field_name
        FROM notes n
        LEFT JOIN users u ON n.created_by = u.id
        LEFT JOIN people p ON u.person_id = p.id
        WHERE n.section_id = $1 AND n.foreign_id = $2 AND n.is_active = TRUE
        "#
    );
    fetch_events(pool, &sql, section_id, foreign_id).await
}

async fn file_events(pool: &PgPool, section_id: i32, foreign_id: i32) -> AppResult<Vec<HistoryEvent>> {
    let sql = format!(
        r#"
        SELECT
            f.id,
            'file' AS type,
            'Archivo subido: ' || f.file_name AS description,
            f.created_date AS event_date,
            {USER_COLUMNS},
            NULL::text AS old_value,
            f.file_name::text AS new_value,
            'file_upload'::text AS field_name
        FROM files f
        LEFT JOIN users u ON f.created_by = u.id
        LEFT JOIN people p ON u.person_id = p.id
        WHERE f.section_id = $1 AND f.foreign_id = $2 AND f.is_active = TRUE
        "#
    );
    fetch_events(pool, &sql, section_id, foreign_id).await
}

async fn fetch_events(pool: &PgPool, sql: &str, section_id: i32, foreign_id: i32) -> AppResult<Vec<HistoryEvent>> {
    let events = sqlx::query_as::<_, HistoryEvent>(sql)
        .bind(section_id)
        .bind(foreign_id)
        .fetch_all(pool)
        .await?;
    Ok(events)
}

/// Evento de creación del registro; tabla y columna salen de `HistorySection`
async fn creation_event(pool: &PgPool, section: HistorySection, foreign_id: i32) -> AppResult<Option<HistoryEvent>> {
    let sql = format!(
        r#"
        SELECT
            e.id,
            'creation' AS type,
            'Registro creado: ' || e.{label} AS description,
            e.created_date AS event_date,
            {USER_COLUMNS},
            NULL::text AS old_value,
            NULL::text AS new_value,
            'created'::text AS field_name
        FROM {table} e
        LEFT JOIN users u ON e.created_by = u.id
        LEFT JOIN people p ON u.person_id = p.id
        WHERE e.id = $1
        "#,
        label = section.label_column(),
        table = section.table(),
    );
    let event = sqlx::query_as::<_, HistoryEvent>(&sql)
        .bind(foreign_id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: i32, kind: &str, day: u32) -> HistoryEvent {
        HistoryEvent {
            id,
            event_type: kind.to_string(),
            description: None,
            event_date: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            user_name: None,
            user_full_name: None,
            user_photo: None,
            old_value: None,
            new_value: None,
            field_name: None,
        }
    }

    #[test]
    fn test_sections_cover_one_to_eight() {
        for id in 1..=8 {
            assert!(HistorySection::from_id(id).is_some());
        }
        assert!(HistorySection::from_id(0).is_none());
        assert!(HistorySection::from_id(9).is_none());
        assert_eq!(HistorySection::from_id(7).map(|s| s.table()), Some("pre_inventory"));
    }

    #[test]
    fn test_invalid_section_is_bad_request() {
        let err = HistorySection::parse(42).unwrap_err();
        assert!(matches!(err, crate::utils::errors::AppError::BadRequest(ref m) if m == "Invalid section_id"));
    }

    #[test]
    fn test_merge_timeline_newest_first() {
        let merged = merge_timeline(vec![
            vec![event(1, "chatter", 3)],
            vec![event(2, "note", 10), event(3, "note", 1)],
            vec![event(4, "file", 5)],
        ]);
        let ids: Vec<i32> = merged.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);

        let json = serde_json::to_value(&merged[0]).unwrap();
        assert_eq!(json["type"], "note");
    }
}
