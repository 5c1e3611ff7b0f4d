//! Routers por módulo, montados bajo `/api/<módulo>`

use axum::{middleware::from_fn_with_state, Router};

use crate::api::{dashboard, history, ml_analysis};
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub mod auth_routes;
pub mod catalog_routes;
pub mod chatter_routes;
pub mod customer_routes;
pub mod file_routes;
pub mod fuel_requisition_routes;
pub mod invoice_routes;
pub mod labor_routes;
pub mod material_routes;
pub mod note_routes;
pub mod pre_inventory_routes;
pub mod project_routes;
pub mod purchase_order_routes;
pub mod supplier_routes;
pub mod user_routes;
pub mod warehouse_routes;

/// Todas las rutas `/api/*`; solo `POST /api/auth/login` es pública
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/users", user_routes::create_user_router())
        .nest("/customers", customer_routes::create_customer_router())
        .nest("/invoices", invoice_routes::create_invoice_router())
        .nest("/projects", project_routes::create_project_router())
        .nest("/materials", material_routes::create_material_router())
        .nest("/warehouse", warehouse_routes::create_warehouse_router())
        .nest("/purchase-orders", purchase_order_routes::create_purchase_order_router())
        .nest("/suppliers", supplier_routes::create_supplier_router())
        .nest("/labor", labor_routes::create_labor_router())
        .nest("/fuel-requisitions", fuel_requisition_routes::create_fuel_requisition_router())
        .nest("/pre-inventory", pre_inventory_routes::create_pre_inventory_router())
        .nest("/catalogs", catalog_routes::create_catalog_router())
        .nest("/chatter", chatter_routes::create_chatter_router())
        .nest("/notes", note_routes::create_note_router())
        .nest("/files", file_routes::create_file_router())
        .nest("/history", history::create_history_router())
        .nest("/dashboard", dashboard::create_dashboard_router())
        .nest("/ml-analysis", ml_analysis::create_ml_analysis_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/auth", auth_routes::create_auth_router(state))
        .merge(protected)
}
