//! Response builders
//!
//! Every JSON response carries CORS and no-store headers. Errors use the
//! `{ "message": ..., "field"?: ... }` shape the browser client reads.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE,
};
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error};

use crate::types::GatewayError;

pub type FullBody = Full<Bytes>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: bool,
}

fn with_cors(mut response: Response<FullBody>) -> Response<FullBody> {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<FullBody> {
    let json = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    let mut response = Response::new(Full::new(Bytes::from(json)));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    with_cors(response)
}

pub fn message_response(status: StatusCode, message: &str) -> Response<FullBody> {
    json_response(
        status,
        &ErrorBody {
            message: message.to_string(),
            field: None,
        },
    )
}

/// Render an error, logging internal detail instead of returning it
pub fn error_response(err: &GatewayError) -> Response<FullBody> {
    if err.is_internal() {
        error!(error = %err, "request failed");
    } else {
        debug!(error = %err, "request rejected");
    }

    json_response(
        err.status_code(),
        &ErrorBody {
            message: err.public_message(),
            field: err.field().map(str::to_string),
        },
    )
}

pub fn success_response() -> Response<FullBody> {
    json_response(StatusCode::OK, &SuccessBody { success: true })
}

/// CORS preflight response
pub fn preflight_response() -> Response<FullBody> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;

    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, x-auth-key"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    with_cors(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response<FullBody>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_error_is_generic() {
        let resp = error_response(&GatewayError::Database("socket closed".into()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("field").is_none());
    }

    #[tokio::test]
    async fn test_validation_error_names_field() {
        let resp = error_response(&GatewayError::Validation {
            field: "author".into(),
            message: "author is required".into(),
        });
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["field"], "author");
        assert_eq!(body["message"], "author is required");
    }

    #[test]
    fn test_preflight_allows_auth_header() {
        let resp = preflight_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let allowed = resp.headers()[ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
        assert!(allowed.contains("x-auth-key"));
    }
}
