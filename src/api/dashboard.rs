//! Resumen del dashboard
//!
//! Cuatro agregados independientes (clientes, facturas, proyectos y
//! materiales) consultados en paralelo sobre el pool.

use axum::{extract::State, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::dto::common_dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppResult;

#[derive(Debug, Serialize, FromRow)]
pub struct CustomerCounts {
    pub total: i64,
    pub active: i64,
    pub new_this_month: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct InvoiceCounts {
    pub total: i64,
    pub paid: i64,
    pub pending: i64,
    pub overdue: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ProjectCounts {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    pub in_progress: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MaterialCounts {
    pub total_items: i64,
    pub low_stock_count: i64,
    pub total_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub customers: CustomerCounts,
    pub invoices: InvoiceCounts,
    pub projects: ProjectCounts,
    pub materials: MaterialCounts,
}

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(get_dashboard_stats))
}

async fn get_dashboard_stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let pool = &state.pool;
    let (customers, invoices, projects, materials) = futures::try_join!(
        customer_counts(pool),
        invoice_counts(pool),
        project_counts(pool),
        material_counts(pool),
    )?;

    Ok(Json(ApiResponse::success(DashboardStats {
        customers,
        invoices,
        projects,
        materials,
    })))
}

async fn customer_counts(pool: &PgPool) -> AppResult<CustomerCounts> {
    let counts = sqlx::query_as::<_, CustomerCounts>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE is_active = TRUE) AS active,
            COUNT(*) FILTER (WHERE created_date >= CURRENT_DATE - INTERVAL '1 month') AS new_this_month
        FROM customers
        WHERE is_active = TRUE
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

async fn invoice_counts(pool: &PgPool) -> AppResult<InvoiceCounts> {
    let counts = sqlx::query_as::<_, InvoiceCounts>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE s.alias = 'paid') AS paid,
            COUNT(*) FILTER (WHERE s.alias = 'pending') AS pending,
            COUNT(*) FILTER (WHERE s.alias = 'pending' AND i.due_date < CURRENT_DATE) AS overdue,
            COALESCE(SUM(i.total_amount), 0) AS total_amount
        FROM invoices i
        LEFT JOIN cat_invoice_statuses s ON i.invoice_status_id = s.id
        WHERE i.is_active = TRUE
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

/// `in_progress` cuenta los proyectos activos
async fn project_counts(pool: &PgPool) -> AppResult<ProjectCounts> {
    let counts = sqlx::query_as::<_, ProjectCounts>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE s.alias = 'active') AS active,
            COUNT(*) FILTER (WHERE s.alias = 'completed') AS completed,
            COUNT(*) FILTER (WHERE s.alias = 'active') AS in_progress
        FROM projects p
        LEFT JOIN cat_project_statuses s ON p.project_status_id = s.id
        WHERE p.is_active = TRUE
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

async fn material_counts(pool: &PgPool) -> AppResult<MaterialCounts> {
    let counts = sqlx::query_as::<_, MaterialCounts>(
        r#"
        SELECT
            COUNT(*) AS total_items,
            COUNT(*) FILTER (WHERE current_stock < minimum_stock) AS low_stock_count,
            COALESCE(SUM(current_stock * unit_cost), 0) AS total_value
        FROM materials
        WHERE is_active = TRUE
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(counts)
}
