use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::fuel_requisition_controller::FuelRequisitionController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse, PeriodResponse};
use crate::dto::fuel_requisition_dto::{
    ConsumptionQuery, CreateFuelRequisitionRequest, FuelRequisitionFilter, UpdateFuelRequisitionRequest,
    UpdateRequisitionStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::fuel_requisition::{ConsumptionRow, FuelRequisition, FuelRequisitionDetail, FuelStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_requisition_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requisitions).post(create_requisition))
        .route("/stats", get(fuel_stats))
        .route("/consumption-report", get(consumption_report))
        .route(
            "/:id",
            get(get_requisition).put(update_requisition).delete(delete_requisition),
        )
        .route("/:id/status", patch(update_requisition_status))
}

async fn list_requisitions(
    State(state): State<AppState>,
    Query(filter): Query<FuelRequisitionFilter>,
) -> Result<Json<PaginatedResponse<FuelRequisitionDetail>>, AppError> {
    let controller = FuelRequisitionController::new(state.pool.clone());
    Ok(Json(controller.list(filter).await?))
}

async fn fuel_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<FuelStats>>, AppError> {
    let controller = FuelRequisitionController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn consumption_report(
    State(state): State<AppState>,
    Query(query): Query<ConsumptionQuery>,
) -> Result<Json<PeriodResponse<ConsumptionRow>>, AppError> {
    let controller = FuelRequisitionController::new(state.pool.clone());
    Ok(Json(controller.consumption_report(query).await?))
}

async fn get_requisition(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FuelRequisitionDetail>>, AppError> {
    let controller = FuelRequisitionController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_requisition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateFuelRequisitionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FuelRequisition>>), AppError> {
    let controller = FuelRequisitionController::new(state.pool.clone());
    let requisition = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(requisition, "Fuel requisition created successfully")),
    ))
}

async fn update_requisition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateFuelRequisitionRequest>,
) -> Result<Json<ApiResponse<FuelRequisition>>, AppError> {
    let controller = FuelRequisitionController::new(state.pool.clone());
    let requisition = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(requisition, "Fuel requisition updated successfully")))
}

async fn update_requisition_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRequisitionStatusRequest>,
) -> Result<Json<ApiResponse<FuelRequisition>>, AppError> {
    let controller = FuelRequisitionController::new(state.pool.clone());
    let requisition = controller.update_status(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(requisition, "Requisition status updated successfully")))
}

async fn delete_requisition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = FuelRequisitionController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Fuel requisition deleted successfully")))
}
