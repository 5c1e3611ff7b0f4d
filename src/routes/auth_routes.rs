use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap},
    middleware::from_fn_with_state,
    routing::post,
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{ChangePasswordRequest, ClientInfo, LoginRequest, LoginResponse};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `/login` es público; el resto pasa por el middleware de autenticación
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/change-password", post(change_password))
        .route_layer(from_fn_with_state(state, auth_middleware));

    Router::new().route("/login", post(login)).merge(protected)
}

fn client_info(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientInfo {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    ClientInfo {
        ip_address: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}

async fn login(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let client = client_info(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let controller = AuthController::new(state.pool.clone());
    let response = controller.login(request, client, &state.jwt_config()).await?;
    Ok(Json(ApiResponse::success_with_message(response, "Login successful")))
}

async fn logout(Extension(user): Extension<AuthenticatedUser>) -> Json<ApiResponse<()>> {
    tracing::info!("👋 Logout: {}", user.email);
    Json(ApiResponse::message("Logout successful"))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AuthController::new(state.pool.clone());
    controller.change_password(user.user_id, request).await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_info_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.7, 172.16.0.1"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));

        let peer: SocketAddr = "127.0.0.1:5555".parse().unwrap();
        let info = client_info(&headers, Some(peer));
        assert_eq!(info.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn test_client_info_falls_back_to_peer() {
        let peer: SocketAddr = "192.168.1.20:4000".parse().unwrap();
        let info = client_info(&HeaderMap::new(), Some(peer));
        assert_eq!(info.ip_address.as_deref(), Some("192.168.1.20"));
        assert_eq!(info.user_agent, None);
    }
}
