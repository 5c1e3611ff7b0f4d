use serde_json::Value;
use sqlx::PgPool;

use crate::models::chatter::{ChatterPost, ChatterPostDetail, MentionCandidate};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::pagination::PageParams;

const DETAIL_SELECT: &str = r#"
    SELECT
        cp.*,
        u.username AS created_by_name,
        CONCAT_WS(' ', p.person_names, p.last_name1) AS created_by_full_name,
        p.photo_url AS created_by_photo,
        (SELECT COUNT(*) FROM chatter_posts r WHERE r.parent_id = cp.id AND r.is_active = TRUE) AS replies_count
    FROM chatter_posts cp
    LEFT JOIN users u ON cp.created_by = u.id
    LEFT JOIN people p ON u.person_id = p.id
"#;

pub struct ChatterRepository {
    pool: PgPool,
}

impl ChatterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        section_id: i32,
        foreign_id: i32,
        post_text: &str,
        mentions: Option<&Value>,
        parent_id: Option<i32>,
        user_id: i32,
    ) -> Result<ChatterPostDetail, AppError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO chatter_posts (section_id, foreign_id, post_text, mentions, parent_id,
                                       created_by, modified_by)
            VALUES ($1, $2, $3, COALESCE($4, '[]'::jsonb), $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(section_id)
        .bind(foreign_id)
        .bind(post_text)
        .bind(mentions)
        .bind(parent_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| not_found_error("Post"))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ChatterPostDetail>, AppError> {
        let sql = format!("{} WHERE cp.id = $1", DETAIL_SELECT);
        let post = sqlx::query_as::<_, ChatterPostDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    /// Publicaciones de primer nivel de una entidad, más recientes primero
    pub async fn by_entity(
        &self,
        section_id: i32,
        foreign_id: i32,
        params: &PageParams,
    ) -> Result<(Vec<ChatterPostDetail>, i64), AppError> {
        let sql = format!(
            "{} WHERE cp.section_id = $1 AND cp.foreign_id = $2 AND cp.is_active = TRUE AND cp.parent_id IS NULL \
             ORDER BY cp.created_date DESC LIMIT $3 OFFSET $4",
            DETAIL_SELECT
        );
        let posts = sqlx::query_as::<_, ChatterPostDetail>(&sql)
            .bind(section_id)
            .bind(foreign_id)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM chatter_posts
            WHERE section_id = $1 AND foreign_id = $2 AND is_active = TRUE AND parent_id IS NULL
            "#,
        )
        .bind(section_id)
        .bind(foreign_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((posts, total))
    }

    pub async fn replies(&self, parent_id: i32) -> Result<Vec<ChatterPostDetail>, AppError> {
        let sql = format!(
            "{} WHERE cp.parent_id = $1 AND cp.is_active = TRUE ORDER BY cp.created_date ASC",
            DETAIL_SELECT
        );
        let replies = sqlx::query_as::<_, ChatterPostDetail>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(replies)
    }

    pub async fn find_active(&self, id: i32) -> Result<Option<ChatterPost>, AppError> {
        let post = sqlx::query_as::<_, ChatterPost>(
            "SELECT * FROM chatter_posts WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    pub async fn update(
        &self,
        id: i32,
        post_text: &str,
        mentions: Option<&Value>,
        user_id: i32,
    ) -> Result<ChatterPost, AppError> {
        let post = sqlx::query_as::<_, ChatterPost>(
            r#"
            UPDATE chatter_posts SET
                post_text = $2,
                mentions = COALESCE($3, mentions),
                modified_by = $4,
                modified_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(post_text)
        .bind(mentions)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    /// Baja lógica de la publicación y de sus respuestas
    pub async fn soft_delete_thread(&self, id: i32, user_id: i32) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE chatter_posts
            SET is_active = FALSE, modified_by = $2, modified_date = NOW()
            WHERE (id = $1 OR parent_id = $1) AND is_active = TRUE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn search_users(&self, pattern: &str) -> Result<Vec<MentionCandidate>, AppError> {
        let users = sqlx::query_as::<_, MentionCandidate>(
            r#"
            SELECT
                u.id,
                u.username,
                CONCAT_WS(' ', p.person_names, p.last_name1) AS full_name,
                p.photo_url
            FROM users u
            LEFT JOIN people p ON u.person_id = p.id
            WHERE u.usr_active = TRUE
              AND (
                  u.username ILIKE $1
                  OR p.person_names ILIKE $1
                  OR p.last_name1 ILIKE $1
                  OR CONCAT_WS(' ', p.person_names, p.last_name1) ILIKE $1
              )
            ORDER BY u.username
            LIMIT 10
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
