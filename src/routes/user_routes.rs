use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::user_controller::UserController;
use crate::dto::common_dto::{ApiResponse, ListQuery, PaginatedResponse};
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserStatsResponse};
use crate::models::user::{User, UserDetail};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/stats", get(user_stats))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<UserDetail>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}

async fn user_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<UserStatsResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDetail>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let controller = UserController::new(state.pool.clone());
    let user = controller.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(user, "User created successfully")),
    ))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let user = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(user, "User updated successfully")))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    controller.deactivate(id).await?;
    Ok(Json(ApiResponse::message("User deactivated successfully")))
}
