use sqlx::PgPool;

use crate::dto::note_dto::{CreateNoteRequest, UpdateNoteRequest};
use crate::models::note::{Note, NoteDetail};
use crate::repositories::note_repository::NoteRepository;
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};
use crate::utils::validation::require_text;

pub struct NoteController {
    repository: NoteRepository,
}

impl NoteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: NoteRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateNoteRequest, user_id: i32) -> Result<Note, AppError> {
        match (
            request.section_id,
            request.foreign_id,
            require_text(request.note_text.as_deref()),
        ) {
            (Some(section_id), Some(foreign_id), Some(text)) => {
                self.repository.create(section_id, foreign_id, text, user_id).await
            }
            _ => Err(bad_request_error("section_id, foreign_id, and note_text are required")),
        }
    }

    pub async fn by_entity(&self, section_id: i32, foreign_id: i32) -> Result<Vec<NoteDetail>, AppError> {
        self.repository.by_entity(section_id, foreign_id).await
    }

    pub async fn my_notes(&self, user_id: i32) -> Result<Vec<NoteDetail>, AppError> {
        self.repository.by_author(user_id).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<NoteDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Note"))
    }

    pub async fn update(&self, id: i32, request: UpdateNoteRequest, user_id: i32) -> Result<Note, AppError> {
        let note_text =
            require_text(request.note_text.as_deref()).ok_or_else(|| bad_request_error("note_text is required"))?;
        self.repository
            .update(id, note_text, user_id)
            .await?
            .ok_or_else(|| not_found_or_deleted("Note"))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("Note"));
        }
        Ok(())
    }
}
