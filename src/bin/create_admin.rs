//! Crear el usuario administrador inicial
//!
//! `ADMIN_EMAIL` y `ADMIN_PASSWORD` sustituyen a los valores por defecto
//! (`admin@erp.com` / `admin123`). Si el correo ya existe no hace nada.

use anyhow::{Context, Result};
use bcrypt::{hash, DEFAULT_COST};
use dotenvy::dotenv;
use tracing::{info, warn};

use erp_backend::database::DatabaseConnection;
use erp_backend::repositories::user_repository::{NewUser, UserRepository};

const ADMIN_ROLE_ID: i32 = 1;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@erp.com".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let db = DatabaseConnection::new_default().await?;
    db.run_migrations().await?;
    let pool = db.pool().clone();
    let users = UserRepository::new(pool.clone());

    if users.email_exists(&email).await? {
        info!("ℹ️ El usuario {} ya existe", email);
        return Ok(());
    }

    let person_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO people (person_names, last_name1, last_name2, email)
        VALUES ('Administrator', 'System', 'User', $1)
        RETURNING id
        "#,
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .context("No se pudo crear el registro de persona")?;

    let user = users
        .create(NewUser {
            person_id,
            role_id: ADMIN_ROLE_ID,
            email: email.clone(),
            password_hash: hash(&password, DEFAULT_COST)?,
            username: "Administrator".to_string(),
            lastname: "System User".to_string(),
            usr_active: true,
            expiration_date: None,
            is_generic: false,
        })
        .await
        .context("No se pudo crear el usuario")?;

    info!("✅ Administrador creado: {} (id {})", user.email, user.id);
    warn!("⚠️ Cambia la contraseña después del primer inicio de sesión");
    Ok(())
}
