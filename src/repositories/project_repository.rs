use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::project_dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::models::project::{Project, ProjectDetail, ProjectStats, ProjectTotals, ProjectsByType};
use crate::utils::audit::{self, ChangeLog, ChangeLogEntry};
use crate::utils::codes::{next_code, CodeKind};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageParams;

const DETAIL_SELECT: &str = r#"
    SELECT
        p.*,
        c.company_name,
        pt.name AS project_type_name,
        ps.name AS status_name,
        ps.alias AS status_alias,
        pa.name AS area_name,
        s.state_name,
        m.username AS manager_name,
        u.username AS created_by_name
    FROM projects p
    LEFT JOIN customers c ON p.customer_id = c.id
    LEFT JOIN cat_project_types pt ON p.project_type_id = pt.id
    LEFT JOIN cat_project_statuses ps ON p.project_status_id = ps.id
    LEFT JOIN cat_project_areas pa ON p.project_area_id = pa.id
    LEFT JOIN cat_states s ON p.location_state_id = s.id
    LEFT JOIN users m ON p.project_manager_id = m.id
    LEFT JOIN users u ON p.created_by = u.id
"#;

pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, search: &Option<String>) {
        builder.push(" WHERE p.is_active = TRUE");
        if let Some(pattern) = search {
            builder
                .push(" AND (p.project_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.project_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.company_name ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
    }

    pub async fn list(
        &self,
        params: &PageParams,
        search: Option<String>,
    ) -> Result<(Vec<ProjectDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        Self::push_where(&mut query, &search);
        query
            .push(" ORDER BY p.created_date DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let projects = query.build_query_as::<ProjectDetail>().fetch_all(&self.pool).await?;

        let mut count =
            QueryBuilder::new("SELECT COUNT(*) FROM projects p LEFT JOIN customers c ON p.customer_id = c.id");
        Self::push_where(&mut count, &search);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((projects, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ProjectDetail>, AppError> {
        let sql = format!("{} WHERE p.id = $1 AND p.is_active = TRUE", DETAIL_SELECT);
        let project = sqlx::query_as::<_, ProjectDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    pub async fn stats(&self) -> Result<ProjectStats, AppError> {
        let totals = sqlx::query_as::<_, ProjectTotals>(
            r#"
            SELECT
                COUNT(*) AS total_projects,
                COUNT(*) FILTER (WHERE ps.alias = 'active') AS active_projects,
                COUNT(*) FILTER (WHERE ps.alias = 'completed') AS completed_projects,
                COUNT(*) FILTER (WHERE ps.alias = 'cancelled') AS cancelled_projects,
                COUNT(*) FILTER (WHERE ps.alias = 'on_hold') AS on_hold_projects,
                COALESCE(SUM(p.total_budget), 0) AS total_estimated_budget,
                COALESCE(ROUND(AVG(p.total_budget), 2), 0) AS average_budget,
                ROUND(AVG(p.estimated_end_date - p.start_date)::numeric, 1) AS average_duration_days,
                0::numeric AS total_actual_cost
            FROM projects p
            LEFT JOIN cat_project_statuses ps ON p.project_status_id = ps.id
            WHERE p.is_active = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let projects_by_type = sqlx::query_as::<_, ProjectsByType>(
            r#"
            SELECT
                pt.name AS project_type,
                COUNT(*) AS count,
                COALESCE(SUM(p.total_budget), 0) AS total_budget
            FROM projects p
            LEFT JOIN cat_project_types pt ON p.project_type_id = pt.id
            WHERE p.is_active = TRUE
            GROUP BY pt.name
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ProjectStats {
            totals,
            projects_by_type,
        })
    }

    pub async fn create(&self, request: &CreateProjectRequest, user_id: i32) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;

        let project_number = match request.project_number.as_deref() {
            Some(number) => number.to_string(),
            None => next_code(&mut tx, CodeKind::Project).await?,
        };

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (project_number, project_name, customer_id, project_type_id,
                                  project_area_id, project_status_id, start_date, estimated_end_date,
                                  actual_end_date, total_budget, location_address, location_city,
                                  location_state_id, project_manager_id, description,
                                  created_by, modified_by)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 1), $7, $8, $9, COALESCE($10, 0), $11, $12,
                    $13, $14, $15, $16, $16)
            RETURNING *
            "#,
        )
        .bind(project_number)
        .bind(request.project_name.as_deref())
        .bind(request.customer_id)
        .bind(request.project_type_id)
        .bind(request.project_area_id)
        .bind(request.project_status_id)
        .bind(request.start_date)
        .bind(request.estimated_end_date)
        .bind(request.actual_end_date)
        .bind(request.total_budget)
        .bind(request.location_address.as_deref())
        .bind(request.location_city.as_deref())
        .bind(request.location_state_id)
        .bind(request.project_manager_id)
        .bind(request.description.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Merge parcial; los campos que cambian quedan en `projects_log`
    pub async fn update(
        &self,
        id: i32,
        request: &UpdateProjectRequest,
        user_id: i32,
    ) -> Result<Option<Project>, AppError> {
        let mut tx = self.pool.begin().await?;

        let before = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(before) = before else {
            return Ok(None);
        };

        let after = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                project_number = COALESCE($2, project_number),
                project_name = COALESCE($3, project_name),
                customer_id = COALESCE($4, customer_id),
                project_type_id = COALESCE($5, project_type_id),
                project_area_id = COALESCE($6, project_area_id),
                project_status_id = COALESCE($7, project_status_id),
                start_date = COALESCE($8, start_date),
                estimated_end_date = COALESCE($9, estimated_end_date),
                actual_end_date = COALESCE($10, actual_end_date),
                total_budget = COALESCE($11, total_budget),
                location_address = COALESCE($12, location_address),
                location_city = COALESCE($13, location_city),
                location_state_id = COALESCE($14, location_state_id),
                project_manager_id = COALESCE($15, project_manager_id),
                description = COALESCE($16, description),
                modified_by = $17,
                modified_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.project_number.as_deref())
        .bind(request.project_name.as_deref())
        .bind(request.customer_id)
        .bind(request.project_type_id)
        .bind(request.project_area_id)
        .bind(request.project_status_id)
        .bind(request.start_date)
        .bind(request.estimated_end_date)
        .bind(request.actual_end_date)
        .bind(request.total_budget)
        .bind(request.location_address.as_deref())
        .bind(request.location_city.as_deref())
        .bind(request.location_state_id)
        .bind(request.project_manager_id)
        .bind(request.description.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let changes = audit::diff(&before, &after);
        audit::insert_changes(&mut tx, ChangeLog::Projects, id, user_id, &changes).await?;

        tx.commit().await?;
        Ok(Some(after))
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE projects SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn history(&self, id: i32) -> Result<Vec<ChangeLogEntry>, AppError> {
        let mut conn = self.pool.acquire().await?;
        audit::list_changes(&mut conn, ChangeLog::Projects, id).await
    }
}
