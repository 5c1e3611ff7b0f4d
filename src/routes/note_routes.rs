use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::note_controller::NoteController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::note_dto::{CreateNoteRequest, UpdateNoteRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::note::{Note, NoteDetail};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_note_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_note))
        .route("/my-notes", get(my_notes))
        .route("/entity/:section_id/:foreign_id", get(entity_notes))
        .route("/:id", get(get_note).put(update_note).delete(delete_note))
}

async fn create_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Note>>), AppError> {
    let controller = NoteController::new(state.pool.clone());
    let note = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(note, "Note created successfully")),
    ))
}

async fn my_notes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<NoteDetail>>>, AppError> {
    let controller = NoteController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.my_notes(user.user_id).await?)))
}

async fn entity_notes(
    State(state): State<AppState>,
    Path((section_id, foreign_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<Vec<NoteDetail>>>, AppError> {
    let controller = NoteController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.by_entity(section_id, foreign_id).await?)))
}

async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<NoteDetail>>, AppError> {
    let controller = NoteController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn update_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateNoteRequest>,
) -> Result<Json<ApiResponse<Note>>, AppError> {
    let controller = NoteController::new(state.pool.clone());
    let note = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(note, "Note updated successfully")))
}

async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = NoteController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Note deleted successfully")))
}
