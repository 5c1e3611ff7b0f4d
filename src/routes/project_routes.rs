use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::project_controller::ProjectController;
use crate::dto::common_dto::{ApiResponse, ListQuery, PaginatedResponse};
use crate::dto::project_dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::project::{Project, ProjectDetail, ProjectStats};
use crate::state::AppState;
use crate::utils::audit::ChangeLogEntry;
use crate::utils::errors::AppError;

pub fn create_project_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/stats", get(project_stats))
        .route("/:id", get(get_project).put(update_project).delete(delete_project))
        .route("/:id/history", get(project_history))
}

async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<ProjectDetail>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}

async fn project_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<ProjectStats>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProjectDetail>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), AppError> {
    let controller = ProjectController::new(state.pool.clone());
    let project = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(project, "Project created successfully")),
    ))
}

async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    let project = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(project, "Project updated successfully")))
}

async fn delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Project deleted successfully")))
}

async fn project_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ChangeLogEntry>>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.history(id).await?)))
}
