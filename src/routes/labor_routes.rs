use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::labor_controller::LaborController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse, PeriodResponse};
use crate::dto::labor_dto::{
    CreateTimesheetRequest, PayrollQuery, TimesheetFilter, UpdatePaymentStatusRequest, UpdateTimesheetRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::labor::{LaborStats, PayrollRow, Timesheet, TimesheetDetail};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_labor_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_timesheets).post(create_timesheet))
        .route("/stats", get(labor_stats))
        .route("/payroll-report", get(payroll_report))
        .route("/:id", get(get_timesheet).put(update_timesheet).delete(delete_timesheet))
        .route("/:id/payment-status", patch(update_payment_status))
}

async fn list_timesheets(
    State(state): State<AppState>,
    Query(filter): Query<TimesheetFilter>,
) -> Result<Json<PaginatedResponse<TimesheetDetail>>, AppError> {
    let controller = LaborController::new(state.pool.clone());
    Ok(Json(controller.list(filter).await?))
}

async fn labor_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<LaborStats>>, AppError> {
    let controller = LaborController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn payroll_report(
    State(state): State<AppState>,
    Query(query): Query<PayrollQuery>,
) -> Result<Json<PeriodResponse<PayrollRow>>, AppError> {
    let controller = LaborController::new(state.pool.clone());
    Ok(Json(controller.payroll_report(query).await?))
}

async fn get_timesheet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TimesheetDetail>>, AppError> {
    let controller = LaborController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_timesheet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTimesheetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Timesheet>>), AppError> {
    let controller = LaborController::new(state.pool.clone());
    let timesheet = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(timesheet, "Timesheet created successfully")),
    ))
}

async fn update_timesheet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTimesheetRequest>,
) -> Result<Json<ApiResponse<Timesheet>>, AppError> {
    let controller = LaborController::new(state.pool.clone());
    let timesheet = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(timesheet, "Timesheet updated successfully")))
}

async fn update_payment_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = LaborController::new(state.pool.clone());
    controller.update_payment_status(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::message("Payment status updated successfully")))
}

async fn delete_timesheet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = LaborController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Timesheet deleted successfully")))
}
