use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};

use crate::controllers::catalog_controller::CatalogController;
use crate::dto::common_dto::ApiResponse;
use crate::models::catalog::CatalogInfo;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_catalogs))
        .route("/:catalog_name", get(list_entries).post(create_entry))
        .route(
            "/:catalog_name/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

async fn list_catalogs(State(state): State<AppState>) -> Json<ApiResponse<Vec<CatalogInfo>>> {
    let controller = CatalogController::new(state.pool.clone());
    Json(ApiResponse::success(controller.catalogs()))
}

async fn list_entries(
    State(state): State<AppState>,
    Path(catalog_name): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let controller = CatalogController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.entries(&catalog_name).await?)))
}

async fn get_entry(
    State(state): State<AppState>,
    Path((catalog_name, id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let controller = CatalogController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.entry(&catalog_name, id).await?)))
}

async fn create_entry(
    State(state): State<AppState>,
    Path(catalog_name): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let controller = CatalogController::new(state.pool.clone());
    let entry = controller.create(&catalog_name, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(entry, "Catalog entry created successfully")),
    ))
}

async fn update_entry(
    State(state): State<AppState>,
    Path((catalog_name, id)): Path<(String, i32)>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let controller = CatalogController::new(state.pool.clone());
    let entry = controller.update(&catalog_name, id, body).await?;
    Ok(Json(ApiResponse::success_with_message(entry, "Catalog entry updated successfully")))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path((catalog_name, id)): Path<(String, i32)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CatalogController::new(state.pool.clone());
    controller.delete(&catalog_name, id).await?;
    Ok(Json(ApiResponse::message("Catalog entry deleted successfully")))
}
