//! Blog post endpoints
//!
//! - `GET /api/posts` - list, newest first
//! - `GET /api/posts/{id}` - single post
//! - `POST /api/posts` - create (auth)
//! - `PUT /api/posts/{id}` - partial update (auth)
//! - `DELETE /api/posts/{id}` - delete (auth)

use hyper::{Response, StatusCode};
use tracing::info;

use super::response::{json_response, success_response, FullBody};
use super::{validation, ApiRequest};
use crate::server::AppState;
use crate::types::{GatewayError, Result};

fn post_not_found() -> GatewayError {
    GatewayError::NotFound("Post not found".into())
}

pub async fn list(state: &AppState) -> Result<Response<FullBody>> {
    let posts = state.store.list_posts().await?;
    Ok(json_response(StatusCode::OK, &posts))
}

pub async fn get(state: &AppState, id: &str) -> Result<Response<FullBody>> {
    let post = state.store.get_post(id).await?.ok_or_else(post_not_found)?;
    Ok(json_response(StatusCode::OK, &post))
}

pub async fn create(state: &AppState, req: &ApiRequest<'_>) -> Result<Response<FullBody>> {
    req.require_auth(state)?;
    let new_post = validation::new_post(&req.body)?;

    let post = state.store.create_post(new_post).await?;
    info!(id = %post.id, "post created");
    Ok(json_response(StatusCode::CREATED, &post))
}

pub async fn update(state: &AppState, req: &ApiRequest<'_>, id: &str) -> Result<Response<FullBody>> {
    req.require_auth(state)?;
    let patch = validation::post_patch(&req.body)?;

    let post = state
        .store
        .update_post(id, patch)
        .await?
        .ok_or_else(post_not_found)?;
    info!(id = %post.id, "post updated");
    Ok(json_response(StatusCode::OK, &post))
}

pub async fn delete(state: &AppState, req: &ApiRequest<'_>, id: &str) -> Result<Response<FullBody>> {
    req.require_auth(state)?;

    if !state.store.delete_post(id).await? {
        return Err(post_not_found());
    }
    info!(id = %id, "post deleted");
    Ok(success_response())
}
