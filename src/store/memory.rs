//! In-memory content store
//!
//! Used when MongoDB is unavailable in dev mode, and by tests. Records live
//! in insertion order; listings walk them backwards so the newest comes
//! first. Identifiers follow the same ObjectId scheme as MongoDB.

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::model::{Log, NewLog, NewPost, NewQuote, Post, PostPatch, Quote};
use super::ContentStore;
use crate::types::Result;

#[derive(Default)]
struct Collections {
    posts: Vec<Post>,
    quotes: Vec<Quote>,
    logs: Vec<Log>,
    auth_keys: Vec<String>,
}

/// Process-local store with no persistence
#[derive(Default)]
pub struct MemoryContentStore {
    inner: RwLock<Collections>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Canonical form of `id`, or `None` when it is not a well-formed ObjectId
fn normalize_id(id: &str) -> Option<String> {
    ObjectId::parse_str(id).ok().map(|oid| oid.to_hex())
}

fn new_id() -> String {
    ObjectId::new().to_hex()
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.posts.iter().rev().cloned().collect())
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        let Some(id) = normalize_id(id) else {
            return Ok(None);
        };
        let inner = self.inner.read().await;
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let post = Post {
            id: new_id(),
            title: post.title,
            description: post.description,
            thumbnail: post.thumbnail,
            content: post.content,
            created_at: Utc::now(),
        };
        self.inner.write().await.posts.push(post.clone());
        debug!(id = %post.id, "post stored in memory");
        Ok(post)
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<Option<Post>> {
        let Some(id) = normalize_id(id) else {
            return Ok(None);
        };
        let mut inner = self.inner.write().await;
        Ok(inner.posts.iter_mut().find(|p| p.id == id).map(|post| {
            patch.apply(post);
            post.clone()
        }))
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        let Some(id) = normalize_id(id) else {
            return Ok(false);
        };
        let mut inner = self.inner.write().await;
        let before = inner.posts.len();
        inner.posts.retain(|p| p.id != id);
        Ok(inner.posts.len() < before)
    }

    async fn list_quotes(&self) -> Result<Vec<Quote>> {
        let inner = self.inner.read().await;
        Ok(inner.quotes.iter().rev().cloned().collect())
    }

    async fn create_quote(&self, quote: NewQuote) -> Result<Quote> {
        let quote = Quote {
            id: new_id(),
            content: quote.content,
            author: quote.author,
            created_at: Utc::now(),
        };
        self.inner.write().await.quotes.push(quote.clone());
        Ok(quote)
    }

    async fn delete_quote(&self, id: &str) -> Result<bool> {
        let Some(id) = normalize_id(id) else {
            return Ok(false);
        };
        let mut inner = self.inner.write().await;
        let before = inner.quotes.len();
        inner.quotes.retain(|q| q.id != id);
        Ok(inner.quotes.len() < before)
    }

    async fn list_logs(&self) -> Result<Vec<Log>> {
        let inner = self.inner.read().await;
        Ok(inner.logs.iter().rev().cloned().collect())
    }

    async fn create_log(&self, log: NewLog) -> Result<Log> {
        let log = Log {
            id: new_id(),
            title: log.title,
            content: log.content,
            created_at: Utc::now(),
        };
        self.inner.write().await.logs.push(log.clone());
        Ok(log)
    }

    async fn auth_key(&self) -> Result<Option<String>> {
        Ok(self.inner.read().await.auth_keys.first().cloned())
    }

    async fn seed_auth_key(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.auth_keys.iter().any(|k| k == key) {
            inner.auth_keys.push(key.to_string());
        }
        Ok(())
    }
}
