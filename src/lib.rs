//! ERP backend: API REST sobre PostgreSQL
//!
//! Clientes, facturación, proyectos, inventario, compras, mano de obra,
//! combustible y los módulos de colaboración (chatter, notas y archivos).

pub mod api;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_middleware_with_origins;
use crate::state::AppState;
use crate::utils::errors::{expose_error_details, AppError};

/// Construir la aplicación completa con sus capas
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware_with_origins(&state.config.cors_origins);
    let body_limit = state.config.max_upload_size;
    expose_error_details(state.config.is_development());

    Router::new()
        .route("/health", get(api::health::health_check))
        .nest("/api", routes::create_api_router(state.clone()))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}
