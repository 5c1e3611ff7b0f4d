use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::material_controller::MaterialController;
use crate::dto::common_dto::{ApiResponse, ListQuery, PaginatedResponse};
use crate::dto::material_dto::{CreateMaterialRequest, UpdateMaterialRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::material::{LowStockMaterial, Material, MaterialDetail, MaterialStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `/low-stock` y `/stats` se registran antes que `/:id`
pub fn create_material_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route("/low-stock", get(low_stock_materials))
        .route("/stats", get(material_stats))
        .route("/:id", get(get_material).put(update_material).delete(delete_material))
}

async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<MaterialDetail>>, AppError> {
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}

async fn low_stock_materials(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LowStockMaterial>>>, AppError> {
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.low_stock().await?)))
}

async fn material_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<MaterialStats>>, AppError> {
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.stats().await?)))
}

async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MaterialDetail>>, AppError> {
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_material(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Material>>), AppError> {
    let controller = MaterialController::new(state.pool.clone());
    let material = controller.create(request, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(material, "Material created successfully")),
    ))
}

async fn update_material(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateMaterialRequest>,
) -> Result<Json<ApiResponse<Material>>, AppError> {
    let controller = MaterialController::new(state.pool.clone());
    let material = controller.update(id, request, user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(material, "Material updated successfully")))
}

async fn delete_material(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MaterialController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Material deleted successfully")))
}
