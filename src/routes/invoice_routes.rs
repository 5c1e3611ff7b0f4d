use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::common_dto::{ApiResponse, ListQuery, PaginatedResponse};
use crate::dto::invoice_dto::{CreateInvoiceRequest, UpdateInvoiceRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::invoice::{Invoice, InvoiceDetail, InvoiceStats};
use crate::state::AppState;
use crate::utils::audit::ChangeLogEntry;
use crate::utils::errors::AppError;

pub fn create_invoice_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/stats", get(invoice_stats))
        .route("/:id", get(get_invoice).put(update_invoice).delete(delete_invoice))
        .route("/:id/history", get(invoice_history))
}

async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<InvoiceDetail>>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}

async fn invoice_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<InvoiceStats>>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<InvoiceDetail>>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Invoice>>), AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    let invoice = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(invoice, "Invoice created successfully")),
    ))
}

async fn update_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    let invoice = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(invoice, "Invoice updated successfully")))
}

async fn delete_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Invoice deleted successfully")))
}

async fn invoice_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ChangeLogEntry>>>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.history(id).await?)))
}
