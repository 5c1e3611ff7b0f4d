use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::customer_controller::CustomerController;
use crate::dto::common_dto::{ApiResponse, ListQuery, PaginatedResponse};
use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::customer::{Customer, CustomerDetail};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_customer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
}

async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<CustomerDetail>>, AppError> {
    let controller = CustomerController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CustomerDetail>>, AppError> {
    let controller = CustomerController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_customer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>), AppError> {
    let controller = CustomerController::new(state.pool.clone());
    let customer = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(customer, "Customer created successfully")),
    ))
}

async fn update_customer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let controller = CustomerController::new(state.pool.clone());
    let customer = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(customer, "Customer updated successfully")))
}

async fn delete_customer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CustomerController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Customer deleted successfully")))
}
