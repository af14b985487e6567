//! Patient intelligence endpoint.
//!
//! `POST /api/analyze` runs the engine over uploaded transaction records.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeRequest, ApiContext};
use crate::intelligence::PatientIntelResult;

/// `POST /api/analyze`: full intelligence result for the uploaded records.
///
/// The engine itself never fails; only an unreadable body is an error.
pub async fn run(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<PatientIntelResult>, ApiError> {
    let Json(request) = payload?;
    let engine = ctx.engine();

    tracing::debug!(
        records = request.records.len(),
        filter = request.procedure_filter.as_deref().unwrap_or("all"),
        "Analysis requested"
    );

    // CPU-bound on large uploads.
    let result = tokio::task::spawn_blocking(move || {
        engine.analyze(&request.records, request.procedure_filter.as_deref())
    })
    .await?;

    Ok(Json(result))
}
