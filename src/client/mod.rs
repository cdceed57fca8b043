//! Typed HTTP client for the content API
//!
//! Reads go through a [`QueryCache`]; successful writes invalidate the
//! listing they affect (and the post's own path for post updates and
//! deletes), so the next read refetches.

pub mod cache;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::auth::AUTH_BODY_FIELD;
use crate::store::{Log, NewLog, NewPost, NewQuote, Post, PostPatch, Quote};

pub use cache::{QueryCache, DEFAULT_CACHE_TTL};

const POSTS_PATH: &str = "/api/posts";
const QUOTES_PATH: &str = "/api/quotes";
const LOGS_PATH: &str = "/api/logs";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

pub struct ContentClient {
    base_url: String,
    auth_key: Option<String>,
    http: reqwest::Client,
    cache: QueryCache,
}

impl ContentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("jaat-gateway-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_key: None,
            http,
            cache: QueryCache::default(),
        }
    }

    /// Send `key` as `authKey` on every mutating request
    pub fn with_auth_key(mut self, key: impl Into<String>) -> Self {
        self.auth_key = Some(key.into());
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = QueryCache::new(ttl);
        self
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn list_posts(&self) -> ClientResult<Vec<Post>> {
        self.query(POSTS_PATH).await
    }

    pub async fn get_post(&self, id: &str) -> ClientResult<Post> {
        self.query(&post_path(id)).await
    }

    pub async fn create_post(&self, post: &NewPost) -> ClientResult<Post> {
        let created = self.mutate(Method::POST, POSTS_PATH, post).await?;
        self.cache.invalidate(&[POSTS_PATH]);
        Ok(created)
    }

    pub async fn update_post(&self, id: &str, patch: &PostPatch) -> ClientResult<Post> {
        let path = post_path(id);
        let updated = self.mutate(Method::PUT, &path, patch).await?;
        self.cache.invalidate(&[POSTS_PATH, path.as_str()]);
        Ok(updated)
    }

    pub async fn delete_post(&self, id: &str) -> ClientResult<()> {
        let path = post_path(id);
        let _: Value = self.mutate(Method::DELETE, &path, &json!({})).await?;
        self.cache.invalidate(&[POSTS_PATH, path.as_str()]);
        Ok(())
    }

    pub async fn list_quotes(&self) -> ClientResult<Vec<Quote>> {
        self.query(QUOTES_PATH).await
    }

    pub async fn create_quote(&self, quote: &NewQuote) -> ClientResult<Quote> {
        let created = self.mutate(Method::POST, QUOTES_PATH, quote).await?;
        self.cache.invalidate(&[QUOTES_PATH]);
        Ok(created)
    }

    pub async fn delete_quote(&self, id: &str) -> ClientResult<()> {
        let path = format!("{}/{}", QUOTES_PATH, id);
        let _: Value = self.mutate(Method::DELETE, &path, &json!({})).await?;
        self.cache.invalidate(&[QUOTES_PATH]);
        Ok(())
    }

    pub async fn list_logs(&self) -> ClientResult<Vec<Log>> {
        self.query(LOGS_PATH).await
    }

    pub async fn create_log(&self, log: &NewLog) -> ClientResult<Log> {
        let created = self.mutate(Method::POST, LOGS_PATH, log).await?;
        self.cache.invalidate(&[LOGS_PATH]);
        Ok(created)
    }

    async fn query<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        if let Some(cached) = self.cache.get(path) {
            debug!(path = %path, "query served from cache");
            return Ok(cached);
        }

        let response = self.http.get(self.url(path)).send().await?;
        let value = read_response(response).await?;
        let typed = serde_json::from_value(value.clone())?;
        self.cache.insert(path, value);
        Ok(typed)
    }

    async fn mutate<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut payload = serde_json::to_value(body)?;
        if let (Some(key), Value::Object(map)) = (&self.auth_key, &mut payload) {
            map.insert(AUTH_BODY_FIELD.to_string(), Value::String(key.clone()));
        }

        let response = self
            .http
            .request(method, self.url(path))
            .json(&payload)
            .send()
            .await?;
        let value = read_response(response).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn post_path(id: &str) -> String {
    format!("{}/{}", POSTS_PATH, id)
}

/// Decode the JSON body, turning non-2xx statuses into `ClientError::Api`
async fn read_response(response: reqwest::Response) -> ClientResult<Value> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    if status.is_success() {
        return Ok(value);
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
