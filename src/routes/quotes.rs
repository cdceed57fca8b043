//! Quote endpoints
//!
//! - `GET /api/quotes` - list, newest first
//! - `POST /api/quotes` - create (auth)
//! - `DELETE /api/quotes/{id}` - delete (auth)

use hyper::{Response, StatusCode};
use tracing::info;

use super::response::{json_response, success_response, FullBody};
use super::{validation, ApiRequest};
use crate::server::AppState;
use crate::types::{GatewayError, Result};

pub async fn list(state: &AppState) -> Result<Response<FullBody>> {
    let quotes = state.store.list_quotes().await?;
    Ok(json_response(StatusCode::OK, &quotes))
}

pub async fn create(state: &AppState, req: &ApiRequest<'_>) -> Result<Response<FullBody>> {
    req.require_auth(state)?;
    let new_quote = validation::new_quote(&req.body)?;

    let quote = state.store.create_quote(new_quote).await?;
    info!(id = %quote.id, "quote created");
    Ok(json_response(StatusCode::CREATED, &quote))
}

pub async fn delete(state: &AppState, req: &ApiRequest<'_>, id: &str) -> Result<Response<FullBody>> {
    req.require_auth(state)?;

    if !state.store.delete_quote(id).await? {
        return Err(GatewayError::NotFound("Quote not found".into()));
    }
    info!(id = %id, "quote deleted");
    Ok(success_response())
}
