//! Análisis predictivo
//!
//! Los modelos aún no están integrados: `PlaceholderPredictionService`
//! devuelve valores fijos con la forma que tendrán las respuestas reales.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};

use crate::dto::common_dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict_project_cost(&self, project: Value) -> AppResult<Value>;
    async fn predict_project_duration(&self, project: Value) -> AppResult<Value>;
    async fn segment_customers(&self) -> AppResult<Value>;
    async fn predict_turnover(&self, employee: Value) -> AppResult<Value>;
    async fn optimize_inventory(&self, material: Value) -> AppResult<Value>;
    async fn health(&self) -> AppResult<Value>;
}

pub struct PlaceholderPredictionService;

#[async_trait]
impl PredictionService for PlaceholderPredictionService {
    async fn predict_project_cost(&self, _project: Value) -> AppResult<Value> {
        Ok(json!({
            "success": true,
            "predicted_cost": 500000,
            "confidence": 0.85,
            "model": "RandomForestRegressor",
            "features_used": ["project_type", "area_m2", "location", "complexity"],
            "mae": 8.5,
            "rmse": 12.3
        }))
    }

    async fn predict_project_duration(&self, _project: Value) -> AppResult<Value> {
        Ok(json!({
            "success": true,
            "predicted_days": 90,
            "confidence": 0.78,
            "model": "GradientBoostingRegressor",
            "mae_days": 7,
            "rmse_days": 10
        }))
    }

    async fn segment_customers(&self) -> AppResult<Value> {
        Ok(json!({
            "success": true,
            "segments": [
                {
                    "segment": "VIP",
                    "count": 12,
                    "avg_revenue": 2000000,
                    "characteristics": "High volume, frequent projects, long-term relationships"
                },
                {
                    "segment": "Frequent",
                    "count": 35,
                    "avg_revenue": 500000,
                    "characteristics": "Regular projects, moderate volume"
                },
                {
                    "segment": "Sporadic",
                    "count": 78,
                    "avg_revenue": 100000,
                    "characteristics": "Occasional projects, price-sensitive"
                },
                {
                    "segment": "New",
                    "count": 23,
                    "avg_revenue": 50000,
                    "characteristics": "Recent customers, potential for growth"
                }
            ],
            "model": "KMeans",
            "variables": ["annual_volume", "project_frequency", "customer_age", "industry_type"]
        }))
    }

    async fn predict_turnover(&self, _employee: Value) -> AppResult<Value> {
        Ok(json!({
            "success": true,
            "turnover_probability": 0.23,
            "risk_level": "low",
            "model": "LogisticRegression",
            "accuracy": 0.82,
            "factors": [
                { "factor": "tenure", "impact": "negative" },
                { "factor": "salary", "impact": "negative" },
                { "factor": "performance", "impact": "positive" }
            ]
        }))
    }

    async fn optimize_inventory(&self, _material: Value) -> AppResult<Value> {
        Ok(json!({
            "success": true,
            "recommended_order_quantity": 500,
            "predicted_demand_next_month": 450,
            "safety_stock": 100,
            "reorder_point": 200,
            "model": "ARIMA",
            "forecast_accuracy": 0.88
        }))
    }

    async fn health(&self) -> AppResult<Value> {
        Ok(json!({
            "success": true,
            "message": "ML Analysis Service operational",
            "available_models": 5,
            "models": [
                "Project Cost Prediction (RandomForest)",
                "Project Duration Prediction (GradientBoosting)",
                "Customer Segmentation (KMeans)",
                "Employee Turnover Prediction (LogisticRegression)",
                "Inventory Optimization (ARIMA)"
            ]
        }))
    }
}

type SharedPredictions = Arc<dyn PredictionService>;

pub fn create_ml_analysis_router() -> Router<AppState> {
    create_router_with(Arc::new(PlaceholderPredictionService))
}

pub fn create_router_with(service: SharedPredictions) -> Router<AppState> {
    Router::new()
        .route("/predict-project-cost", post(predict_project_cost))
        .route("/predict-project-duration", post(predict_project_duration))
        .route("/segment-customers", get(segment_customers))
        .route("/predict-turnover", post(predict_turnover))
        .route("/optimize-inventory", post(optimize_inventory))
        .route("/health", get(ml_health))
        .layer(Extension(service))
}

/// El cuerpo es opcional; uno vacío o inválido se trata como `{}`
fn body(payload: Option<Json<Value>>) -> Value {
    payload.map(|Json(v)| v).unwrap_or_else(|| json!({}))
}

async fn predict_project_cost(
    Extension(service): Extension<SharedPredictions>,
    payload: Option<Json<Value>>,
) -> AppResult<Json<ApiResponse<Value>>> {
    Ok(Json(ApiResponse::success(service.predict_project_cost(body(payload)).await?)))
}

async fn predict_project_duration(
    Extension(service): Extension<SharedPredictions>,
    payload: Option<Json<Value>>,
) -> AppResult<Json<ApiResponse<Value>>> {
    Ok(Json(ApiResponse::success(service.predict_project_duration(body(payload)).await?)))
}

async fn segment_customers(Extension(service): Extension<SharedPredictions>) -> AppResult<Json<ApiResponse<Value>>> {
    Ok(Json(ApiResponse::success(service.segment_customers().await?)))
}

async fn predict_turnover(
    Extension(service): Extension<SharedPredictions>,
    payload: Option<Json<Value>>,
) -> AppResult<Json<ApiResponse<Value>>> {
    Ok(Json(ApiResponse::success(service.predict_turnover(body(payload)).await?)))
}

async fn optimize_inventory(
    Extension(service): Extension<SharedPredictions>,
    payload: Option<Json<Value>>,
) -> AppResult<Json<ApiResponse<Value>>> {
    Ok(Json(ApiResponse::success(service.optimize_inventory(body(payload)).await?)))
}

async fn ml_health(Extension(service): Extension<SharedPredictions>) -> AppResult<Json<ApiResponse<Value>>> {
    Ok(Json(ApiResponse::success(service.health().await?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_values_are_fixed() {
        let service = PlaceholderPredictionService;
        let cost = service.predict_project_cost(json!({"area_m2": 120})).await.unwrap();
        assert_eq!(cost["predicted_cost"], 500000);

        let segments = service.segment_customers().await.unwrap();
        assert_eq!(segments["segments"].as_array().map(Vec::len), Some(4));

        let health = service.health().await.unwrap();
        assert_eq!(health["available_models"], 5);
    }
}
