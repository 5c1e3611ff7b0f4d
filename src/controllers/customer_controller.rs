use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{ListQuery, PaginatedResponse};
use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::models::customer::{Customer, CustomerDetail};
use crate::repositories::customer_repository::CustomerRepository;
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};
use crate::utils::pagination::DEFAULT_LIMIT;
use crate::utils::validation::require_text;

pub struct CustomerController {
    repository: CustomerRepository,
}

impl CustomerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CustomerRepository::new(pool),
        }
    }

    pub async fn list(&self, query: ListQuery) -> Result<PaginatedResponse<CustomerDetail>, AppError> {
        let params = query.page_params(DEFAULT_LIMIT);
        let (customers, total) = self.repository.list(&params, query.search_pattern()).await?;
        Ok(PaginatedResponse::new(customers, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<CustomerDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Customer"))
    }

    pub async fn create(&self, request: CreateCustomerRequest, user_id: i32) -> Result<Customer, AppError> {
        if require_text(request.company_name.as_deref()).is_none() {
            return Err(bad_request_error("Company name is required"));
        }
        request.validate()?;

        let customer = self.repository.create(&request, user_id).await?;
        info!("🏢 Cliente creado: {} (id {})", customer.company_name, customer.id);
        Ok(customer)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateCustomerRequest,
        user_id: i32,
    ) -> Result<Customer, AppError> {
        request.validate()?;
        self.repository
            .update(id, &request, user_id)
            .await?
            .ok_or_else(|| not_found_or_deleted("Customer"))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("Customer"));
        }
        info!("🗑️ Cliente {} desactivado", id);
        Ok(())
    }
}
