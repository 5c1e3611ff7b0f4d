use sqlx::PgPool;

use crate::models::note::{Note, NoteDetail};
use crate::utils::errors::AppError;

const DETAIL_SELECT: &str = r#"
    SELECT
        n.*,
        uc.username AS created_by_name,
        um.username AS modified_by_name
    FROM notes n
    LEFT JOIN users uc ON n.created_by = uc.id
    LEFT JOIN users um ON n.modified_by = um.id
"#;

pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, section_id: i32, foreign_id: i32, note_text: &str, user_id: i32) -> Result<Note, AppError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (section_id, foreign_id, note_text, created_by, modified_by)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(section_id)
        .bind(foreign_id)
        .bind(note_text)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    pub async fn by_entity(&self, section_id: i32, foreign_id: i32) -> Result<Vec<NoteDetail>, AppError> {
        let sql = format!(
            "{} WHERE n.section_id = $1 AND n.foreign_id = $2 AND n.is_active = TRUE ORDER BY n.created_date DESC",
            DETAIL_SELECT
        );
        let notes = sqlx::query_as::<_, NoteDetail>(&sql)
            .bind(section_id)
            .bind(foreign_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(notes)
    }

    pub async fn by_author(&self, user_id: i32) -> Result<Vec<NoteDetail>, AppError> {
        let sql = format!(
            "{} WHERE n.created_by = $1 AND n.is_active = TRUE ORDER BY n.created_date DESC",
            DETAIL_SELECT
        );
        let notes = sqlx::query_as::<_, NoteDetail>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(notes)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<NoteDetail>, AppError> {
        let sql = format!("{} WHERE n.id = $1 AND n.is_active = TRUE", DETAIL_SELECT);
        let note = sqlx::query_as::<_, NoteDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(note)
    }

    pub async fn update(&self, id: i32, note_text: &str, user_id: i32) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes SET note_text = $2, modified_by = $3, modified_date = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(note_text)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE notes SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
