//! Health check endpoint
//!
//! `GET /health` returns 200 while the process is serving, along with the
//! store backend in use (`mongodb` or `memory`).

use hyper::{Response, StatusCode};
use serde::Serialize;

use super::response::{json_response, FullBody};
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    /// Store backend name
    pub store: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    pub timestamp: String,
}

pub fn health_check(state: &AppState) -> Response<FullBody> {
    let body = HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend(),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    json_response(StatusCode::OK, &body)
}
