use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};

use crate::controllers::purchase_order_controller::PurchaseOrderController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::purchase_order_dto::{
    CreatePurchaseOrderRequest, PurchaseOrderFilter, ReceiveMaterialsRequest, UpdatePurchaseOrderRequest,
    UpdateStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::purchase_order::{
    CreatedPurchaseOrder, PurchaseOrder, PurchaseOrderStats, PurchaseOrderSummary, PurchaseOrderWithItems,
    ReceiveResult,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_purchase_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_purchase_orders).post(create_purchase_order))
        .route("/stats", get(purchase_order_stats))
        .route(
            "/:id",
            get(get_purchase_order)
                .put(update_purchase_order)
                .delete(delete_purchase_order),
        )
        .route("/:id/status", patch(update_purchase_order_status))
        .route("/:id/receive", post(receive_materials))
}

async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(filter): Query<PurchaseOrderFilter>,
) -> Result<Json<PaginatedResponse<PurchaseOrderSummary>>, AppError> {
    let controller = PurchaseOrderController::new(state.pool.clone());
    Ok(Json(controller.list(filter).await?))
}

async fn purchase_order_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PurchaseOrderStats>>, AppError> {
    let controller = PurchaseOrderController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PurchaseOrderWithItems>>, AppError> {
    let controller = PurchaseOrderController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_purchase_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePurchaseOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedPurchaseOrder>>), AppError> {
    let controller = PurchaseOrderController::new(state.pool.clone());
    let created = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(created, "Purchase order created successfully")),
    ))
}

async fn update_purchase_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePurchaseOrderRequest>,
) -> Result<Json<ApiResponse<PurchaseOrder>>, AppError> {
    let controller = PurchaseOrderController::new(state.pool.clone());
    let order = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(order, "Purchase order updated successfully")))
}

async fn delete_purchase_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PurchaseOrderController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Purchase order deleted successfully")))
}

async fn update_purchase_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PurchaseOrderController::new(state.pool.clone());
    controller.update_status(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::message("Purchase order status updated successfully")))
}

async fn receive_materials(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<ReceiveMaterialsRequest>,
) -> Result<Json<ApiResponse<ReceiveResult>>, AppError> {
    let controller = PurchaseOrderController::new(state.pool.clone());
    let result = controller.receive(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(result, "Materials received successfully")))
}
