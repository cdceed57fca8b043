//! The shared admin secret
//!
//! Compared in constant time; wiped from memory when dropped.

use hyper::HeaderMap;
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::DEV_AUTH_SECRET;
use crate::store::ContentStore;
use crate::types::{GatewayError, Result};

/// JSON body field carrying the credential
pub const AUTH_BODY_FIELD: &str = "authKey";

/// Header carrying the credential when the body does not
pub const AUTH_HEADER: &str = "x-auth-key";

/// Single global admin capability
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuthSecret {
    value: String,
}

impl AuthSecret {
    /// Wrap a secret value. Empty secrets are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(GatewayError::Config("auth secret must not be empty".into()));
        }
        Ok(Self { value })
    }

    /// Check a presented credential
    pub fn verify(&self, candidate: Option<&str>) -> bool {
        match candidate {
            Some(c) if !c.is_empty() => constant_time_compare(c, &self.value),
            _ => false,
        }
    }

    /// Resolve the secret at startup.
    ///
    /// An explicit value wins and is seeded into the store's auth collection.
    /// Otherwise the stored record is used, then the dev secret in dev mode.
    pub async fn resolve(
        configured: Option<&str>,
        store: &dyn ContentStore,
        dev_mode: bool,
    ) -> Result<Self> {
        if let Some(value) = configured {
            let secret = Self::new(value)?;
            store.seed_auth_key(value).await?;
            info!("Auth secret loaded from configuration");
            return Ok(secret);
        }

        if let Some(stored) = store.auth_key().await? {
            info!("Auth secret loaded from auth collection");
            return Self::new(stored);
        }

        if dev_mode {
            warn!("No auth secret configured, using the dev-only secret");
            return Self::new(DEV_AUTH_SECRET);
        }

        Err(GatewayError::Config(
            "no auth secret: set AUTH_SECRET or seed the auth collection".into(),
        ))
    }
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthSecret(<redacted>)")
    }
}

/// Pull the credential from the parsed body, falling back to the header
pub fn extract_credential<'a>(body: &'a Value, headers: &'a HeaderMap) -> Option<&'a str> {
    body.get(AUTH_BODY_FIELD)
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
        .or_else(|| {
            headers
                .get(AUTH_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|k| !k.is_empty())
        })
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryContentStore;
    use hyper::header::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_verify() {
        let secret = AuthSecret::new("A9x7QpL2").unwrap();
        assert!(secret.verify(Some("A9x7QpL2")));
        assert!(!secret.verify(Some("A9x7QpL3")));
        assert!(!secret.verify(Some("A9x7")));
        assert!(!secret.verify(Some("")));
        assert!(!secret.verify(None));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(AuthSecret::new("").is_err());
    }

    #[test]
    fn test_debug_redacts() {
        let secret = AuthSecret::new("hunter2").unwrap();
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }

    #[test]
    fn test_body_credential_preferred_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_static("from-header"));

        let body = json!({ "authKey": "from-body" });
        assert_eq!(extract_credential(&body, &headers), Some("from-body"));

        let body = json!({ "title": "x" });
        assert_eq!(extract_credential(&body, &headers), Some("from-header"));

        let body = json!({ "authKey": 42 });
        assert_eq!(extract_credential(&body, &HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_resolve_seeds_configured_secret() {
        let store = MemoryContentStore::new();
        let secret = AuthSecret::resolve(Some("configured"), &store, false)
            .await
            .unwrap();
        assert!(secret.verify(Some("configured")));
        assert_eq!(store.auth_key().await.unwrap().as_deref(), Some("configured"));

        // A later start without configuration picks up the seeded record
        let secret = AuthSecret::resolve(None, &store, false).await.unwrap();
        assert!(secret.verify(Some("configured")));
    }

    #[tokio::test]
    async fn test_resolve_without_secret() {
        let store = MemoryContentStore::new();
        assert!(AuthSecret::resolve(None, &store, false).await.is_err());

        let secret = AuthSecret::resolve(None, &store, true).await.unwrap();
        assert!(secret.verify(Some(DEV_AUTH_SECRET)));
    }
}
