use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{ListQuery, PaginatedResponse};
use crate::dto::material_dto::{CreateMaterialRequest, UpdateMaterialRequest};
use crate::models::material::{LowStockMaterial, Material, MaterialDetail, MaterialStats};
use crate::repositories::material_repository::MaterialRepository;
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};
use crate::utils::pagination::DEFAULT_LIMIT;
use crate::utils::validation::require_text;

pub struct MaterialController {
    repository: MaterialRepository,
}

impl MaterialController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MaterialRepository::new(pool),
        }
    }

    pub async fn list(&self, query: ListQuery) -> Result<PaginatedResponse<MaterialDetail>, AppError> {
        let params = query.page_params(DEFAULT_LIMIT);
        let (materials, total) = self.repository.list(&params, query.search_pattern()).await?;
        Ok(PaginatedResponse::new(materials, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<MaterialDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Material"))
    }

    pub async fn low_stock(&self) -> Result<Vec<LowStockMaterial>, AppError> {
        self.repository.low_stock().await
    }

    pub async fn stats(&self) -> Result<MaterialStats, AppError> {
        self.repository.stats().await
    }

    pub async fn create(&self, request: CreateMaterialRequest, user_id: i32) -> Result<Material, AppError> {
        if require_text(request.material_name.as_deref()).is_none() {
            return Err(bad_request_error("Material name is required"));
        }
        request.validate()?;

        let material = self.repository.create(&request, user_id).await?;
        info!("📦 Material creado: {} - {}", material.material_code, material.material_name);
        Ok(material)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateMaterialRequest,
        user_id: i32,
    ) -> Result<Material, AppError> {
        request.validate()?;
        self.repository
            .update(id, &request, user_id)
            .await?
            .ok_or_else(|| not_found_or_deleted("Material"))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("Material"));
        }
        Ok(())
    }
}
