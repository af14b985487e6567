use serde::{Deserialize, Serialize};

/// Body sent to the prediction server's `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub zip: String,
    pub procedure: String,
    pub cohort: String,
}

/// Per-platform campaign estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPrediction {
    pub platform: String,
    pub score: f64,
    /// Cost per lead, dollars.
    pub cpl: f64,
    /// Lifetime value, dollars.
    pub ltv: f64,
    pub roas: f64,
}

/// The prediction server answers either with a bare array or a wrapped object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Bare(Vec<PlatformPrediction>),
    Wrapped { predictions: Vec<PlatformPrediction> },
}

impl PredictionResponse {
    pub fn into_predictions(self) -> Vec<PlatformPrediction> {
        match self {
            Self::Bare(predictions) | Self::Wrapped { predictions } => predictions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Live,
    Fallback,
}

/// What callers receive: live predictions, or the fixed fallback set with a hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub predictions: Vec<PlatformPrediction>,
    pub source: PredictionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

fn fixed(platform: &str, score: f64, cpl: f64, ltv: f64, roas: f64) -> PlatformPrediction {
    PlatformPrediction {
        platform: platform.into(),
        score,
        cpl,
        ltv,
        roas,
    }
}

/// Fixed estimates served when the prediction server cannot answer.
pub fn fallback_predictions() -> Vec<PlatformPrediction> {
    vec![
        fixed("facebook", 0.82, 45.0, 2400.0, 3.2),
        fixed("instagram", 0.88, 38.0, 2800.0, 4.1),
        fixed("google", 0.75, 62.0, 2100.0, 2.6),
        fixed("tiktok", 0.64, 29.0, 1600.0, 2.2),
    ]
}
