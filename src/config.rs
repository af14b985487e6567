use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Patient Intel";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_BIND_ADDR: &str = "PATIENT_INTEL_ADDR";
pub const ENV_PREDICTION_URL: &str = "PREDICTION_SERVER_URL";
pub const ENV_PREDICTION_TIMEOUT: &str = "PREDICTION_TIMEOUT_SECS";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_PREDICTION_URL: &str = "http://localhost:8000";
pub const DEFAULT_PREDICTION_TIMEOUT_SECS: u64 = 10;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,patient_intel_lib=debug"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address in {var}: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("Invalid timeout in {var}: {value}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("Invalid prediction server URL in {var}: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub prediction_url: String,
    pub prediction_timeout_secs: u64,
}

impl ServiceConfig {
    /// Load from process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get(ENV_BIND_ADDR) {
            Some(raw) => raw.trim().parse::<SocketAddr>().map_err(|_| ConfigError::InvalidAddr {
                var: ENV_BIND_ADDR,
                value: raw.clone(),
            })?,
            None => default_bind_addr(),
        };

        let prediction_url = match get(ENV_PREDICTION_URL) {
            Some(raw) => {
                let url = raw.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidUrl {
                        var: ENV_PREDICTION_URL,
                        value: raw,
                    });
                }
                url
            }
            None => DEFAULT_PREDICTION_URL.to_string(),
        };

        let prediction_timeout_secs = match get(ENV_PREDICTION_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout {
                    var: ENV_PREDICTION_TIMEOUT,
                    value: raw.clone(),
                })?,
            None => DEFAULT_PREDICTION_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            prediction_url,
            prediction_timeout_secs,
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            prediction_url: DEFAULT_PREDICTION_URL.to_string(),
            prediction_timeout_secs: DEFAULT_PREDICTION_TIMEOUT_SECS,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8787))
}
