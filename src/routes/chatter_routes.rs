use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::controllers::chatter_controller::ChatterController;
use crate::dto::chatter_dto::{CreatePostRequest, UpdatePostRequest, UserSearchQuery};
use crate::dto::common_dto::{ApiResponse, ListQuery, PaginatedResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::chatter::{ChatterPost, ChatterPostDetail, MentionCandidate};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_chatter_router() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:section_id/:foreign_id", get(list_entity_posts))
        .route("/posts/:id/replies", get(list_replies))
        .route("/posts/:id", put(update_post).delete(delete_post))
        .route("/users/search", get(search_users))
}

async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChatterPostDetail>>), AppError> {
    let controller = ChatterController::new(state.pool.clone());
    let post = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(post, "Post created successfully")),
    ))
}

async fn list_entity_posts(
    State(state): State<AppState>,
    Path((section_id, foreign_id)): Path<(i32, i32)>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<ChatterPostDetail>>, AppError> {
    let controller = ChatterController::new(state.pool.clone());
    Ok(Json(controller.by_entity(section_id, foreign_id, query).await?))
}

async fn list_replies(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ChatterPostDetail>>>, AppError> {
    let controller = ChatterController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.replies(id).await?)))
}

async fn update_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<ApiResponse<ChatterPost>>, AppError> {
    let controller = ChatterController::new(state.pool.clone());
    let post = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(post, "Post updated successfully")))
}

async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ChatterController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Post deleted successfully")))
}

async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<ApiResponse<Vec<MentionCandidate>>>, AppError> {
    let controller = ChatterController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.search_users(query).await?)))
}
