use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{ListQuery, PaginatedResponse};
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserStatsResponse};
use crate::models::user::{User, UserDetail};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::pagination::DEFAULT_LIMIT;
use crate::utils::validation::require_text;

const DEFAULT_ROLE_ID: i32 = 1;

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, query: ListQuery) -> Result<PaginatedResponse<UserDetail>, AppError> {
        let params = query.page_params(DEFAULT_LIMIT);
        let (users, total) = self.repository.list(&params, query.search_pattern()).await?;
        Ok(PaginatedResponse::new(users, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<UserDetail, AppError> {
        self.repository
            .find_detail(id)
            .await?
            .ok_or_else(|| not_found_error("User"))
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let (Some(person_id), Some(email), Some(password), Some(username), Some(lastname)) = (
            request.person_id,
            require_text(request.email.as_deref()),
            request.usr_password.as_deref().filter(|p| !p.is_empty()),
            require_text(request.username.as_deref()),
            require_text(request.lastname.as_deref()),
        ) else {
            return Err(bad_request_error(
                "Missing required fields: person_id, email, usr_password, username, lastname",
            ));
        };
        request.validate()?;

        if self.repository.email_exists(email).await? {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let user = self
            .repository
            .create(NewUser {
                person_id,
                role_id: request.role_id.unwrap_or(DEFAULT_ROLE_ID),
                email: email.to_string(),
                password_hash: hash(password, DEFAULT_COST)?,
                username: username.to_string(),
                lastname: lastname.to_string(),
                usr_active: request.usr_active.unwrap_or(true),
                expiration_date: request.expiration_date,
                is_generic: request.is_generic.unwrap_or(false),
            })
            .await?;

        info!("👤 Usuario creado: {} (id {})", user.email, user.id);
        Ok(user)
    }

    pub async fn update(&self, id: i32, request: UpdateUserRequest) -> Result<User, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        if let Some(email) = request.email.as_deref() {
            if email != current.email && self.repository.email_exists(email).await? {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }

        self.repository
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("User"))
    }

    pub async fn deactivate(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.deactivate(id).await? {
            return Err(not_found_error("User"));
        }
        info!("👤 Usuario desactivado: {}", id);
        Ok(())
    }

    pub async fn stats(&self) -> Result<UserStatsResponse, AppError> {
        Ok(UserStatsResponse {
            totals: self.repository.totals().await?,
            by_role: self.repository.count_by_role().await?,
        })
    }
}
