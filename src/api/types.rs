//! Shared types for the API layer.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::config::ServiceConfig;
use crate::intelligence::{PatientIntelligenceEngine, PatientRecord};
use crate::prediction::{PredictionClient, PredictionError};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<ServiceConfig>,
    pub prediction: Arc<PredictionClient>,
    /// Fixed reference clock for analyses; `None` reads the wall clock per request.
    pinned_now: Option<NaiveDateTime>,
}

impl ApiContext {
    pub fn new(config: ServiceConfig) -> Result<Self, PredictionError> {
        let prediction =
            PredictionClient::new(&config.prediction_url, config.prediction_timeout_secs)?;
        Ok(Self {
            config: Arc::new(config),
            prediction: Arc::new(prediction),
            pinned_now: None,
        })
    }

    /// Pin the analysis clock (deterministic responses).
    pub fn with_pinned_now(mut self, now: NaiveDateTime) -> Self {
        self.pinned_now = Some(now);
        self
    }

    /// Engine for one request.
    pub fn engine(&self) -> PatientIntelligenceEngine {
        match self.pinned_now {
            Some(now) => PatientIntelligenceEngine::new(now),
            None => PatientIntelligenceEngine::at_current_time(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Request bodies
// ═══════════════════════════════════════════════════════════

/// `POST /api/analyze` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub records: Vec<PatientRecord>,
    #[serde(default, alias = "procedure_filter")]
    pub procedure_filter: Option<String>,
}
