use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{ChangePasswordRequest, ClientInfo, LoginRequest, LoginResponse, LoginUser};
use crate::middleware::auth::check_account;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::jwt::{generate_token, JwtConfig};
use crate::utils::validation::require_text;

pub struct AuthController {
    repository: UserRepository,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn login(
        &self,
        request: LoginRequest,
        client: ClientInfo,
        jwt: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let (Some(email), Some(password)) = (
            require_text(request.email.as_deref()),
            request.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(bad_request_error("Email and password are required"));
        };

        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self.repository.find_by_email(email).await?.ok_or_else(invalid)?;

        check_account(user.usr_active, user.expiration_date, Utc::now())?;

        if !verify(password, &user.usr_password)? {
            warn!("🔒 Contraseña incorrecta para {}", email);
            return Err(invalid());
        }

        let token = generate_token(user.id, &user.email, user.role_id, Some(user.person_id), jwt)?;

        let session_id: String = token.chars().take(50).collect();
        self.repository
            .record_access(
                user.id,
                client.ip_address.as_deref(),
                client.user_agent.as_deref(),
                &session_id,
            )
            .await?;

        info!("✅ Login exitoso: {} (user {})", user.email, user.id);

        Ok(LoginResponse {
            token,
            user: LoginUser {
                id: user.id,
                email: user.email,
                username: user.username,
                lastname: user.lastname,
                role_id: user.role_id,
            },
        })
    }

    pub async fn change_password(&self, user_id: i32, request: ChangePasswordRequest) -> Result<(), AppError> {
        let (Some(current), Some(new_password)) = (
            request.current_password.as_deref().filter(|p| !p.is_empty()),
            request.new_password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(bad_request_error("Current password and new password are required"));
        };
        request.validate()?;

        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        if !verify(current, &user.usr_password)? {
            return Err(AppError::Unauthorized("Current password is incorrect".to_string()));
        }

        let password_hash = hash(new_password, DEFAULT_COST)?;
        self.repository.update_password(user_id, &password_hash).await?;

        info!("🔑 Contraseña actualizada para user {}", user_id);
        Ok(())
    }
}
