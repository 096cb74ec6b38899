use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use super::validated_json::ValidatedJson;
use super::AppState;
use crate::domain::model::{CalculationRequest, TariffOffer};

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello, World!".to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /orders：試算運費
pub async fn calculate_orders(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CalculationRequest>,
) -> Result<Json<Vec<TariffOffer>>, ApiError> {
    state
        .provider
        .get_calc_tariff(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, state.expose_error_details))
}
