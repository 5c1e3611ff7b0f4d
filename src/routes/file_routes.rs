use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use http::header;

use crate::controllers::file_controller::{attachment_header, FileController};
use crate::dto::common_dto::ApiResponse;
use crate::dto::file_dto::{UpdateFileRequest, UploadForm};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::file::{FileDetail, FileRecord};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_file_router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/entity/:section_id/:foreign_id", get(entity_files))
        .route("/:id/download", get(download_file))
        .route("/:id", get(get_file).put(update_file).delete(delete_file))
}

fn controller(state: &AppState) -> FileController {
    FileController::new(state.pool.clone(), state.config.upload_dir.clone())
}

async fn upload_file(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileRecord>>), AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let file = controller(&state).upload(form, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(file, "File uploaded successfully")),
    ))
}

async fn entity_files(
    State(state): State<AppState>,
    Path((section_id, foreign_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<Vec<FileDetail>>>, AppError> {
    let files = controller(&state).by_entity(section_id, foreign_id).await?;
    Ok(Json(ApiResponse::success(files)))
}

async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FileDetail>>, AppError> {
    Ok(Json(ApiResponse::success(controller(&state).get_by_id(id).await?)))
}

async fn download_file(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Response, AppError> {
    let download = controller(&state).download(id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, download.content_type),
            (header::CONTENT_DISPOSITION, attachment_header(&download.file_name)),
        ],
        download.bytes,
    )
        .into_response())
}

async fn update_file(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateFileRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    controller(&state).update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::message("File updated successfully")))
}

async fn delete_file(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    controller(&state).delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("File deleted successfully")))
}
