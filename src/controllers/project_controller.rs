use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{ListQuery, PaginatedResponse};
use crate::dto::project_dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::models::project::{Project, ProjectDetail, ProjectStats};
use crate::repositories::project_repository::ProjectRepository;
use crate::utils::audit::ChangeLogEntry;
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};
use crate::utils::pagination::DEFAULT_LIMIT;
use crate::utils::validation::require_text;

pub struct ProjectController {
    repository: ProjectRepository,
}

impl ProjectController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ProjectRepository::new(pool),
        }
    }

    pub async fn list(&self, query: ListQuery) -> Result<PaginatedResponse<ProjectDetail>, AppError> {
        let params = query.page_params(DEFAULT_LIMIT);
        let (projects, total) = self.repository.list(&params, query.search_pattern()).await?;
        Ok(PaginatedResponse::new(projects, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<ProjectDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Project"))
    }

    pub async fn stats(&self) -> Result<ProjectStats, AppError> {
        self.repository.stats().await
    }

    pub async fn create(&self, request: CreateProjectRequest, user_id: i32) -> Result<Project, AppError> {
        if require_text(request.project_name.as_deref()).is_none() {
            return Err(bad_request_error("Project name is required"));
        }
        request.validate()?;

        let project = self.repository.create(&request, user_id).await?;
        info!("🏗️ Proyecto creado: {} (id {})", project.project_number, project.id);
        Ok(project)
    }

    pub async fn update(&self, id: i32, request: UpdateProjectRequest, user_id: i32) -> Result<Project, AppError> {
        request.validate()?;
        self.repository
            .update(id, &request, user_id)
            .await?
            .ok_or_else(|| not_found_or_deleted("Project"))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("Project"));
        }
        Ok(())
    }

    pub async fn history(&self, id: i32) -> Result<Vec<ChangeLogEntry>, AppError> {
        self.repository.history(id).await
    }
}
