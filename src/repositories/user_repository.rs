use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::user_dto::UpdateUserRequest;
use crate::models::user::{RoleUserCount, User, UserDetail, UserTotals};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageParams;

const DETAIL_SELECT: &str = r#"
    SELECT
        u.id, u.person_id, u.role_id, u.email, u.username, u.lastname,
        u.usr_active, u.expiration_date, u.is_generic, u.created, u.modified,
        r.role_name, p.person_names, p.last_name1, p.last_name2, p.phone1, p.phone2
    FROM users u
    LEFT JOIN cat_roles r ON u.role_id = r.id
    LEFT JOIN people p ON u.person_id = p.id
"#;

pub struct NewUser {
    pub person_id: i32,
    pub role_id: i32,
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub lastname: String,
    pub usr_active: bool,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_generic: bool,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, search: &Option<String>) {
        builder.push(" WHERE 1=1");
        if let Some(pattern) = search {
            builder
                .push(" AND (u.email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.username ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.lastname ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
    }

    pub async fn list(
        &self,
        params: &PageParams,
        search: Option<String>,
    ) -> Result<(Vec<UserDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        Self::push_where(&mut query, &search);
        query
            .push(" ORDER BY u.created DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());

        let users = query.build_query_as::<UserDetail>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM users u");
        Self::push_where(&mut count, &search);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((users, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_detail(&self, id: i32) -> Result<Option<UserDetail>, AppError> {
        let sql = format!("{} WHERE u.id = $1", DETAIL_SELECT);
        let user = sqlx::query_as::<_, UserDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (person_id, role_id, email, usr_password, username, lastname,
                               usr_active, expiration_date, is_generic)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(user.person_id)
        .bind(user.role_id)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.username)
        .bind(user.lastname)
        .bind(user.usr_active)
        .bind(user.expiration_date)
        .bind(user.is_generic)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update(&self, id: i32, request: &UpdateUserRequest) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                person_id = COALESCE($2, person_id),
                role_id = COALESCE($3, role_id),
                email = COALESCE($4, email),
                username = COALESCE($5, username),
                lastname = COALESCE($6, lastname),
                usr_active = COALESCE($7, usr_active),
                expiration_date = COALESCE($8, expiration_date),
                is_generic = COALESCE($9, is_generic),
                modified = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.person_id)
        .bind(request.role_id)
        .bind(request.email.as_deref())
        .bind(request.username.as_deref())
        .bind(request.lastname.as_deref())
        .bind(request.usr_active)
        .bind(request.expiration_date)
        .bind(request.is_generic)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET usr_password = $2, modified = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Baja lógica: `usr_active = false`
    pub async fn deactivate(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET usr_active = FALSE, modified = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn totals(&self) -> Result<UserTotals, AppError> {
        let totals = sqlx::query_as::<_, UserTotals>(
            r#"
            SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE usr_active) AS active_users,
                COUNT(*) FILTER (WHERE NOT usr_active) AS inactive_users,
                COUNT(*) FILTER (WHERE is_generic) AS generic_users,
                COUNT(*) FILTER (WHERE created >= NOW() - INTERVAL '1 month') AS new_this_month
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    pub async fn count_by_role(&self) -> Result<Vec<RoleUserCount>, AppError> {
        let rows = sqlx::query_as::<_, RoleUserCount>(
            r#"
            SELECT r.role_name, COUNT(u.id) AS user_count
            FROM cat_roles r
            LEFT JOIN users u ON r.id = u.role_id AND u.usr_active
            GROUP BY r.id, r.role_name
            ORDER BY user_count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Registrar el login en `last_access` y `historical_access`
    pub async fn record_access(
        &self,
        user_id: i32,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        session_id: &str,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO last_access (user_id, last_access) VALUES ($1, NOW())
            ON CONFLICT (user_id) DO UPDATE SET last_access = EXCLUDED.last_access
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO historical_access (user_id, login_datetime, ip_address, user_agent, session_id)
            VALUES ($1, NOW(), $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(ip_address)
        .bind(user_agent)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
