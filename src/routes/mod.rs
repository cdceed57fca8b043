//! HTTP routes
//!
//! Request flow for every API call: resolve path and method -> parse body ->
//! check credential (mutating post/quote routes) -> validate -> store. Each
//! request is bounded by the configured timeout; expiry renders as a 500.

pub mod health;
pub mod logs;
pub mod posts;
pub mod quotes;
pub mod response;
pub mod validation;

use bytes::Bytes;
use hyper::{HeaderMap, Method, Response, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::auth::extract_credential;
use crate::server::AppState;
use crate::types::{GatewayError, Result};

pub use health::health_check;
pub use response::{error_response, json_response, preflight_response, FullBody};

/// Parsed request handed to the endpoint handlers
pub struct ApiRequest<'a> {
    pub headers: &'a HeaderMap,
    /// JSON object body; `{}` for bodiless requests
    pub body: Value,
}

impl ApiRequest<'_> {
    /// Reject the request unless it carries the shared secret
    pub fn require_auth(&self, state: &AppState) -> Result<()> {
        if state.auth.verify(extract_credential(&self.body, self.headers)) {
            return Ok(());
        }
        warn!("Rejected mutating request: missing or invalid auth key");
        Err(GatewayError::Unauthorized(
            "Unauthorized: Invalid admin auth key.".into(),
        ))
    }
}

/// Known API paths
#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    Health,
    Posts,
    Post(&'a str),
    Quotes,
    Quote(&'a str),
    Logs,
}

impl<'a> Route<'a> {
    /// Parse a path, tolerating one trailing slash
    fn parse(path: &'a str) -> Option<Self> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };

        match path {
            "/health" | "/healthz" => return Some(Self::Health),
            "/api/posts" => return Some(Self::Posts),
            "/api/quotes" => return Some(Self::Quotes),
            "/api/logs" => return Some(Self::Logs),
            _ => {}
        }

        if let Some(id) = single_segment(path, "/api/posts/") {
            return Some(Self::Post(id));
        }
        if let Some(id) = single_segment(path, "/api/quotes/") {
            return Some(Self::Quote(id));
        }
        None
    }
}

fn single_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix)
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

impl Route<'_> {
    /// Whether `method` is served on this path
    fn allows(&self, method: &Method) -> bool {
        match self {
            Self::Health => *method == Method::GET,
            Self::Posts | Self::Quotes | Self::Logs => {
                matches!(*method, Method::GET | Method::POST)
            }
            Self::Post(_) => matches!(*method, Method::GET | Method::PUT | Method::DELETE),
            Self::Quote(_) => *method == Method::DELETE,
        }
    }
}

fn method_not_allowed() -> Response<FullBody> {
    response::message_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Handle one API request with an already-read body, always producing a
/// response. Dispatch is bounded by the configured request timeout.
pub async fn handle_api_request(
    state: &AppState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Response<FullBody> {
    let timeout_ms = state.args.request_timeout_ms;
    let outcome = tokio::time::timeout(
        state.args.request_timeout(),
        dispatch(state, method, path, headers, body),
    )
    .await
    .unwrap_or_else(|_| Err(GatewayError::Timeout(timeout_ms)));

    match outcome {
        Ok(response) => response,
        Err(err) => error_response(&err),
    }
}

/// Route a request to its handler. Not time-bounded; callers apply the
/// request timeout.
pub async fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response<FullBody>> {
    if *method == Method::OPTIONS {
        return Ok(preflight_response());
    }

    let Some(route) = Route::parse(path) else {
        return Err(GatewayError::NotFound("Not found".into()));
    };
    if !route.allows(method) {
        return Ok(method_not_allowed());
    }

    let body = if matches!(*method, Method::POST | Method::PUT | Method::DELETE) {
        validation::parse_body(&body)?
    } else {
        Value::Object(Default::default())
    };
    let req = ApiRequest { headers, body };

    match (method.clone(), route) {
        (Method::GET, Route::Health) => Ok(health_check(state)),

        (Method::GET, Route::Posts) => posts::list(state).await,
        (Method::POST, Route::Posts) => posts::create(state, &req).await,
        (Method::GET, Route::Post(id)) => posts::get(state, id).await,
        (Method::PUT, Route::Post(id)) => posts::update(state, &req, id).await,
        (Method::DELETE, Route::Post(id)) => posts::delete(state, &req, id).await,

        (Method::GET, Route::Quotes) => quotes::list(state).await,
        (Method::POST, Route::Quotes) => quotes::create(state, &req).await,
        (Method::DELETE, Route::Quote(id)) => quotes::delete(state, &req, id).await,

        (Method::GET, Route::Logs) => logs::list(state).await,
        (Method::POST, Route::Logs) => logs::create(state, &req).await,

        _ => Ok(method_not_allowed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collections() {
        assert_eq!(Route::parse("/api/posts"), Some(Route::Posts));
        assert_eq!(Route::parse("/api/posts/"), Some(Route::Posts));
        assert_eq!(Route::parse("/api/quotes"), Some(Route::Quotes));
        assert_eq!(Route::parse("/api/logs"), Some(Route::Logs));
        assert_eq!(Route::parse("/health"), Some(Route::Health));
    }

    #[test]
    fn test_parse_item_routes() {
        assert_eq!(
            Route::parse("/api/posts/65a1f0c2e4b0a1b2c3d4e5f6"),
            Some(Route::Post("65a1f0c2e4b0a1b2c3d4e5f6"))
        );
        assert_eq!(Route::parse("/api/posts/999/"), Some(Route::Post("999")));
        assert_eq!(Route::parse("/api/quotes/abc"), Some(Route::Quote("abc")));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Route::parse("/"), None);
        assert_eq!(Route::parse("/api"), None);
        assert_eq!(Route::parse("/api/posts/a/b"), None);
        assert_eq!(Route::parse("/api/logs/abc"), None);
        assert_eq!(Route::parse("/api/postsx"), None);
    }

    #[test]
    fn test_allowed_methods() {
        assert!(Route::Posts.allows(&Method::POST));
        assert!(Route::Post("x").allows(&Method::PUT));
        assert!(Route::Logs.allows(&Method::POST));
        assert!(!Route::Quotes.allows(&Method::PUT));
        assert!(!Route::Quote("x").allows(&Method::GET));
        assert!(!Route::Logs.allows(&Method::DELETE));
        assert!(!Route::Health.allows(&Method::POST));
    }
}
