use std::time::Duration;

use super::types::{
    fallback_predictions, PlatformPrediction, PredictionOutcome, PredictionRequest,
    PredictionResponse, PredictionSource,
};
use super::PredictionError;

/// HTTP client for the external prediction server.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl PredictionClient {
    /// Create a client for the prediction server at `base_url`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PredictionError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the prediction server for per-platform estimates.
    pub async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<Vec<PlatformPrediction>, PredictionError> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PredictionResponse = response
            .json()
            .await
            .map_err(|e| PredictionError::Parse(e.to_string()))?;

        Ok(parsed.into_predictions())
    }

    /// Like [`predict`](Self::predict), but any failure yields the fixed
    /// fallback set with a remediation hint.
    pub async fn predict_or_fallback(&self, request: &PredictionRequest) -> PredictionOutcome {
        match self.predict(request).await {
            Ok(predictions) => PredictionOutcome {
                predictions,
                source: PredictionSource::Live,
                hint: None,
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    zip = %request.zip,
                    procedure = %request.procedure,
                    "Prediction server failed, serving fallback predictions"
                );
                PredictionOutcome {
                    predictions: fallback_predictions(),
                    source: PredictionSource::Fallback,
                    hint: Some(self.unavailable_hint()),
                }
            }
        }
    }

    /// Check that the prediction server answers HTTP at all.
    /// Any response, whatever the status, counts as reachable.
    pub async fn ping(&self) -> Result<(), PredictionError> {
        self.client
            .get(&self.base_url)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| self.classify(e))
    }

    pub fn unavailable_hint(&self) -> String {
        format!(
            "Make sure the prediction server is running at {}",
            self.base_url
        )
    }

    fn classify(&self, e: reqwest::Error) -> PredictionError {
        if e.is_connect() {
            PredictionError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            PredictionError::Timeout(self.timeout_secs)
        } else {
            PredictionError::Http(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    async fn spawn_stub(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    async fn closed_port() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            zip: "10001".into(),
            procedure: "Botox".into(),
            cohort: "Luxury Clients".into(),
        }
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = PredictionClient::new("http://localhost:8000/", 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.timeout_secs, 5);
    }

    #[tokio::test]
    async fn live_bare_array() {
        let router = Router::new().route(
            "/predict",
            post(|Json(req): Json<PredictionRequest>| async move {
                Json(serde_json::json!([{
                    "platform": format!("google-{}", req.zip),
                    "score": 0.9, "cpl": 20.0, "ltv": 3000.0, "roas": 5.0
                }]))
            }),
        );
        let addr = spawn_stub(router).await;
        let client = PredictionClient::new(&format!("http://{addr}"), 5).unwrap();

        let outcome = client.predict_or_fallback(&request()).await;
        assert_eq!(outcome.source, PredictionSource::Live);
        assert_eq!(outcome.predictions[0].platform, "google-10001");
        assert!(outcome.hint.is_none());
    }

    #[tokio::test]
    async fn live_wrapped_object() {
        let router = Router::new().route(
            "/predict",
            post(|| async {
                Json(serde_json::json!({"predictions": [{
                    "platform": "instagram", "score": 0.7, "cpl": 30.0, "ltv": 2000.0, "roas": 3.0
                }]}))
            }),
        );
        let addr = spawn_stub(router).await;
        let client = PredictionClient::new(&format!("http://{addr}"), 5).unwrap();

        let predictions = client.predict(&request()).await.unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].platform, "instagram");
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let router = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let addr = spawn_stub(router).await;
        let client = PredictionClient::new(&format!("http://{addr}"), 5).unwrap();

        let err = client.predict(&request()).await.unwrap_err();
        assert!(matches!(err, PredictionError::Status { status: 500, .. }));

        let outcome = client.predict_or_fallback(&request()).await;
        assert_eq!(outcome.source, PredictionSource::Fallback);
        assert_eq!(outcome.predictions, fallback_predictions());
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let router = Router::new().route("/predict", post(|| async { "not json" }));
        let addr = spawn_stub(router).await;
        let client = PredictionClient::new(&format!("http://{addr}"), 5).unwrap();

        let err = client.predict(&request()).await.unwrap_err();
        assert!(matches!(err, PredictionError::Parse(_)));
        let outcome = client.predict_or_fallback(&request()).await;
        assert_eq!(outcome.source, PredictionSource::Fallback);
    }

    #[tokio::test]
    async fn unreachable_server_falls_back_with_hint() {
        let addr = closed_port().await;
        let client = PredictionClient::new(&format!("http://{addr}"), 2).unwrap();

        let outcome = client.predict_or_fallback(&request()).await;
        assert_eq!(outcome.source, PredictionSource::Fallback);
        assert_eq!(outcome.predictions.len(), 4);
        let hint = outcome.hint.unwrap();
        assert!(hint.contains("prediction server is running"));
        assert!(hint.contains(&addr.to_string()));

        assert!(client.ping().await.is_err());
    }

    #[tokio::test]
    async fn ping_accepts_any_status() {
        let addr = spawn_stub(Router::new()).await;
        let client = PredictionClient::new(&format!("http://{addr}"), 5).unwrap();
        assert!(client.ping().await.is_ok());
    }
}
