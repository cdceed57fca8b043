//! Content Store
//!
//! Durable CRUD over posts, quotes and logs. The gateway only talks to the
//! `ContentStore` trait; identifier generation stays behind it.
//!
//! - `MongoContentStore` - one MongoDB collection per entity kind
//! - `MemoryContentStore` - process-local fallback for dev mode and tests
//!
//! Every mutating call maps to a single document write.

pub mod memory;
pub mod model;
pub mod mongo;

use async_trait::async_trait;

use crate::types::Result;

pub use memory::MemoryContentStore;
pub use model::{Log, NewLog, NewPost, NewQuote, Post, PostPatch, Quote};
pub use mongo::MongoContentStore;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;

    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// `None` if the id is unknown or not a well-formed identifier
    async fn get_post(&self, id: &str) -> Result<Option<Post>>;

    async fn create_post(&self, post: NewPost) -> Result<Post>;

    /// Merge the supplied fields; `None` if the id is unknown
    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<Option<Post>>;

    /// `true` if a record was actually removed
    async fn delete_post(&self, id: &str) -> Result<bool>;

    /// All quotes, newest first
    async fn list_quotes(&self) -> Result<Vec<Quote>>;

    async fn create_quote(&self, quote: NewQuote) -> Result<Quote>;

    async fn delete_quote(&self, id: &str) -> Result<bool>;

    /// All logs, newest first
    async fn list_logs(&self) -> Result<Vec<Log>>;

    async fn create_log(&self, log: NewLog) -> Result<Log>;

    /// Secret held in the auth collection, if one was seeded
    async fn auth_key(&self) -> Result<Option<String>>;

    /// Insert the secret unless a record with the same key already exists
    async fn seed_auth_key(&self, key: &str) -> Result<()>;
}
