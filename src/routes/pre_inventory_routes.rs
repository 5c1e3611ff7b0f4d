use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::controllers::pre_inventory_controller::PreInventoryController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::pre_inventory_dto::{
    CreatePreInventoryRequest, DiscrepancyQuery, PreInventoryFilter, UpdateCountRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::pre_inventory::{
    CountResult, DiscrepancyReport, PreInventory, PreInventoryAdjustment, PreInventoryDetail, PreInventoryStats,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pre_inventory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pre_inventory).post(create_pre_inventory))
        .route("/reports/discrepancy", get(discrepancy_report))
        .route("/reports/stats", get(pre_inventory_stats))
        .route("/:id", get(get_pre_inventory).delete(cancel_pre_inventory))
        .route("/:id/count", put(update_count))
        .route("/:id/adjust", post(process_adjustment))
}

async fn create_pre_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePreInventoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PreInventory>>), AppError> {
    let controller = PreInventoryController::new(state.pool.clone());
    let record = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(record, "Pre-inventory record created successfully")),
    ))
}

async fn list_pre_inventory(
    State(state): State<AppState>,
    Query(filter): Query<PreInventoryFilter>,
) -> Result<Json<PaginatedResponse<PreInventoryDetail>>, AppError> {
    let controller = PreInventoryController::new(state.pool.clone());
    Ok(Json(controller.list(filter).await?))
}

async fn get_pre_inventory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PreInventoryDetail>>, AppError> {
    let controller = PreInventoryController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn update_count(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCountRequest>,
) -> Result<Json<ApiResponse<CountResult>>, AppError> {
    let controller = PreInventoryController::new(state.pool.clone());
    let result = controller.update_count(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(result, "Physical count updated successfully")))
}

async fn process_adjustment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PreInventoryAdjustment>>, AppError> {
    let controller = PreInventoryController::new(state.pool.clone());
    let adjustment = controller.adjust(id, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(adjustment, "Adjustment processed successfully")))
}

async fn cancel_pre_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PreInventoryController::new(state.pool.clone());
    controller.cancel(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Pre-inventory record cancelled successfully")))
}

async fn discrepancy_report(
    State(state): State<AppState>,
    Query(query): Query<DiscrepancyQuery>,
) -> Result<Json<ApiResponse<DiscrepancyReport>>, AppError> {
    let controller = PreInventoryController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.discrepancy_report(query).await?)))
}

async fn pre_inventory_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PreInventoryStats>>, AppError> {
    let controller = PreInventoryController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}
