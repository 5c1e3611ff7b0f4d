use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::supplier_controller::SupplierController;
use crate::dto::common_dto::{ApiResponse, ListQuery, PaginatedResponse};
use crate::dto::supplier_dto::{CreateSupplierRequest, SupplierFilter, UpdateSupplierRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::purchase_order::PurchaseOrderSummary;
use crate::models::supplier::{Supplier, SupplierCategory, SupplierDetail, SupplierStats, SupplierSummary};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_supplier_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/stats", get(supplier_stats))
        .route("/categories", get(supplier_categories))
        .route("/:id", get(get_supplier).put(update_supplier).delete(delete_supplier))
        .route("/:id/purchase-orders", get(supplier_purchase_orders))
}

async fn list_suppliers(
    State(state): State<AppState>,
    Query(filter): Query<SupplierFilter>,
) -> Result<Json<PaginatedResponse<SupplierSummary>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(controller.list(filter).await?))
}

async fn supplier_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<SupplierStats>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn supplier_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SupplierCategory>>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.categories().await?)))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SupplierDetail>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn supplier_purchase_orders(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<PurchaseOrderSummary>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(controller.purchase_orders(id, query).await?))
}

async fn create_supplier(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Supplier>>), AppError> {
    let controller = SupplierController::new(state.pool.clone());
    let supplier = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(supplier, "Supplier created successfully")),
    ))
}

async fn update_supplier(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateSupplierRequest>,
) -> Result<Json<ApiResponse<Supplier>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    let supplier = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(supplier, "Supplier updated successfully")))
}

async fn delete_supplier(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Supplier deleted successfully")))
}
