pub mod api;
pub mod config;
pub mod intelligence;
pub mod prediction;

use tracing_subscriber::EnvFilter;

pub use intelligence::{analyze_patient_data, PatientIntelResult, PatientRecord};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Server(#[from] api::ServerError),

    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[from] std::io::Error),
}

/// Run the service until Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let service_config = config::ServiceConfig::from_env()?;
    tracing::info!(
        bind_addr = %service_config.bind_addr,
        prediction_url = %service_config.prediction_url,
        timeout_secs = service_config.prediction_timeout_secs,
        "Configuration loaded"
    );

    let mut server = api::start_api_server(service_config).await?;
    tracing::info!(
        session_id = %server.session.session_id,
        addr = %server.session.server_addr,
        "Serving"
    );

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.stopped().await;

    Ok(())
}
