use sqlx::PgPool;
use tracing::info;

use crate::dto::chatter_dto::{CreatePostRequest, UpdatePostRequest, UserSearchQuery};
use crate::dto::common_dto::{ListQuery, PaginatedResponse};
use crate::models::chatter::{ChatterPost, ChatterPostDetail, MentionCandidate};
use crate::repositories::chatter_repository::ChatterRepository;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::pagination::DEFAULT_LIMIT;
use crate::utils::validation::require_text;

pub struct ChatterController {
    repository: ChatterRepository,
}

impl ChatterController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ChatterRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreatePostRequest, user_id: i32) -> Result<ChatterPostDetail, AppError> {
        let (section_id, foreign_id, post_text) = match (
            request.section_id,
            request.foreign_id,
            require_text(request.post_text.as_deref()),
        ) {
            (Some(section_id), Some(foreign_id), Some(text)) => (section_id, foreign_id, text),
            _ => return Err(bad_request_error("section_id, foreign_id, and post_text are required")),
        };

        let post = self
            .repository
            .create(
                section_id,
                foreign_id,
                post_text,
                request.mentions.as_ref(),
                request.parent_id,
                user_id,
            )
            .await?;
        info!("💬 Publicación {} en sección {}/{}", post.post.id, section_id, foreign_id);
        Ok(post)
    }

    pub async fn by_entity(
        &self,
        section_id: i32,
        foreign_id: i32,
        query: ListQuery,
    ) -> Result<PaginatedResponse<ChatterPostDetail>, AppError> {
        let params = query.page_params(DEFAULT_LIMIT);
        let (posts, total) = self.repository.by_entity(section_id, foreign_id, &params).await?;
        Ok(PaginatedResponse::new(posts, &params, total))
    }

    pub async fn replies(&self, id: i32) -> Result<Vec<ChatterPostDetail>, AppError> {
        self.repository.replies(id).await
    }

    pub async fn update(&self, id: i32, request: UpdatePostRequest, user_id: i32) -> Result<ChatterPost, AppError> {
        let post_text =
            require_text(request.post_text.as_deref()).ok_or_else(|| bad_request_error("post_text is required"))?;

        self.ensure_author(id, user_id, "You can only edit your own posts").await?;
        self.repository
            .update(id, post_text, request.mentions.as_ref(), user_id)
            .await
    }

    /// Baja lógica de la publicación junto con sus respuestas
    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        self.ensure_author(id, user_id, "You can only delete your own posts").await?;
        let removed = self.repository.soft_delete_thread(id, user_id).await?;
        info!("🗑️ Publicación {} eliminada ({} filas)", id, removed);
        Ok(())
    }

    pub async fn search_users(&self, query: UserSearchQuery) -> Result<Vec<MentionCandidate>, AppError> {
        match query.pattern() {
            Some(pattern) => self.repository.search_users(&pattern).await,
            None => Ok(Vec::new()),
        }
    }

    async fn ensure_author(&self, id: i32, user_id: i32, message: &str) -> Result<(), AppError> {
        let post = self
            .repository
            .find_active(id)
            .await?
            .ok_or_else(|| not_found_error("Post"))?;
        if post.created_by != Some(user_id) {
            return Err(AppError::Forbidden(message.to_string()));
        }
        Ok(())
    }
}
