//! HTTP API.
//!
//! Exposes the patient intelligence engine and the prediction proxy as JSON
//! endpoints for the web client. Routes are nested under `/api/`; every
//! request passes through the audit logger and a permissive CORS layer.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, start_api_server_with, ApiServer, ApiSession, ServerError};
pub use types::ApiContext;
