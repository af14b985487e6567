//! Campaign prediction proxy.
//!
//! `POST /api/predict` forwards to the external prediction server and always
//! answers 200: when the server fails, the fixed fallback set is returned with
//! `source: "fallback"` and a remediation hint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::prediction::{PredictionOutcome, PredictionRequest};

#[derive(Serialize)]
pub struct StatusResponse {
    pub reachable: bool,
    pub url: String,
}

/// `POST /api/predict`: per-platform campaign estimates.
pub async fn predict(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionOutcome>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(ctx.prediction.predict_or_fallback(&request).await))
}

/// `GET /api/predict/status`: 503 with a hint when the server is down.
pub async fn status(State(ctx): State<ApiContext>) -> Result<Json<StatusResponse>, ApiError> {
    let url = ctx.prediction.base_url().to_string();
    ctx.prediction
        .ping()
        .await
        .map_err(|e| ApiError::PredictionUnavailable {
            url: url.clone(),
            reason: e.to_string(),
        })?;

    Ok(Json(StatusResponse {
        reachable: true,
        url,
    }))
}
