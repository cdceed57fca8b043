//! Log endpoints
//!
//! - `GET /api/logs` - list, newest first
//! - `POST /api/logs` - create (open, no credential)

use hyper::{Response, StatusCode};
use tracing::info;

use super::response::{json_response, FullBody};
use super::{validation, ApiRequest};
use crate::server::AppState;
use crate::types::Result;

pub async fn list(state: &AppState) -> Result<Response<FullBody>> {
    let logs = state.store.list_logs().await?;
    Ok(json_response(StatusCode::OK, &logs))
}

pub async fn create(state: &AppState, req: &ApiRequest<'_>) -> Result<Response<FullBody>> {
    let new_log = validation::new_log(&req.body)?;

    let log = state.store.create_log(new_log).await?;
    info!(id = %log.id, "log created");
    Ok(json_response(StatusCode::CREATED, &log))
}
