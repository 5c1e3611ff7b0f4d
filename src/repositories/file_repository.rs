use sqlx::PgPool;

use crate::models::file::{FileDetail, FileRecord};
use crate::utils::errors::AppError;

/// Datos de un archivo ya escrito en disco
pub struct NewFile<'a> {
    pub section_id: i32,
    pub foreign_id: i32,
    pub file_name: &'a str,
    pub file_path: &'a str,
    pub file_size: i64,
    pub file_type: Option<&'a str>,
    pub file_description: Option<&'a str>,
}

pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, file: &NewFile<'_>, user_id: i32) -> Result<FileRecord, AppError> {
        let record = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (section_id, foreign_id, file_name, file_path, file_size, file_type,
                               file_description, uploaded_by, created_by, modified_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $8)
            RETURNING *
            "#,
        )
        .bind(file.section_id)
        .bind(file.foreign_id)
        .bind(file.file_name)
        .bind(file.file_path)
        .bind(file.file_size)
        .bind(file.file_type)
        .bind(file.file_description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn by_entity(&self, section_id: i32, foreign_id: i32) -> Result<Vec<FileDetail>, AppError> {
        let files = sqlx::query_as::<_, FileDetail>(
            r#"
            SELECT f.*, u.username AS uploaded_by_name
            FROM files f
            LEFT JOIN users u ON f.created_by = u.id
            WHERE f.section_id = $1 AND f.foreign_id = $2 AND f.is_active = TRUE
            ORDER BY f.created_date DESC
            "#,
        )
        .bind(section_id)
        .bind(foreign_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(files)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<FileDetail>, AppError> {
        let file = sqlx::query_as::<_, FileDetail>(
            r#"
            SELECT f.*, u.username AS uploaded_by_name
            FROM files f
            LEFT JOIN users u ON f.created_by = u.id
            WHERE f.id = $1 AND f.is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(file)
    }

    pub async fn update_description(
        &self,
        id: i32,
        description: Option<&str>,
        user_id: i32,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE files SET file_description = $2, modified_by = $3, modified_date = NOW()
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .bind(description)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE files SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
