use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::warehouse_controller::WarehouseController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::warehouse_dto::{
    AdjustInventoryRequest, StockReportQuery, StockSearchQuery, TransactionFilter, TransferFilter,
    TransferRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::warehouse::{
    AdjustmentResult, LocationStock, LocationSummary, StockReportRow, TransactionDetail,
    TransferDetail, TransferResult, WarehouseStats,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_warehouse_router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations))
        .route("/stock/:location_id", get(stock_by_location))
        .route("/transfer", post(transfer_material))
        .route("/adjust", post(adjust_inventory))
        .route("/transactions", get(list_transactions))
        .route("/transfers", get(list_transfers))
        .route("/stats", get(warehouse_stats))
        .route("/report", get(stock_report))
}

async fn list_locations(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<LocationSummary>>>, AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.locations().await?)))
}

async fn stock_by_location(
    State(state): State<AppState>,
    Path(location_id): Path<i32>,
    Query(query): Query<StockSearchQuery>,
) -> Result<Json<ApiResponse<Vec<LocationStock>>>, AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    let stock = controller
        .stock_by_location(location_id, query.search.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(stock)))
}

async fn transfer_material(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransferResult>>), AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    let result = controller.transfer(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(result, "Material transferred successfully")),
    ))
}

async fn adjust_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<AdjustInventoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdjustmentResult>>), AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    let result = controller.adjust(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(result, "Inventory adjusted successfully")),
    ))
}

async fn list_transactions(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<PaginatedResponse<TransactionDetail>>, AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    Ok(Json(controller.transactions(filter).await?))
}

async fn list_transfers(
    State(state): State<AppState>,
    Query(filter): Query<TransferFilter>,
) -> Result<Json<PaginatedResponse<TransferDetail>>, AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    Ok(Json(controller.transfers(filter).await?))
}

async fn warehouse_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<WarehouseStats>>, AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn stock_report(
    State(state): State<AppState>,
    Query(query): Query<StockReportQuery>,
) -> Result<Json<ApiResponse<Vec<StockReportRow>>>, AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stock_report(query).await?)))
}
