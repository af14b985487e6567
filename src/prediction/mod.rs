//! Client for the external campaign prediction server.
//!
//! The server is an optional collaborator: `predict_or_fallback` never fails
//! and substitutes fixed per-platform estimates whenever the server is down,
//! slow, or answers with something unusable.

pub mod client;
pub mod types;

pub use client::PredictionClient;
pub use types::{
    fallback_predictions, PlatformPrediction, PredictionOutcome, PredictionRequest,
    PredictionSource,
};

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Cannot connect to prediction server at {0}")]
    Connection(String),

    #[error("Prediction request timed out after {0}s")]
    Timeout(u64),

    #[error("Prediction server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Prediction response parsing failed: {0}")]
    Parse(String),

    #[error("HTTP client error: {0}")]
    Http(String),
}
