//! Database schemas
//!
//! MongoDB document structures for posts, quotes, logs and the auth key.

mod auth_key;
mod log;
mod post;
mod quote;

use bson::{doc, Document};
use mongodb::options::IndexOptions;

pub use auth_key::{AuthKeyDoc, AUTH_COLLECTION};
pub use log::{LogDoc, LOG_COLLECTION};
pub use post::{PostDoc, POST_COLLECTION};
pub use quote::{QuoteDoc, QUOTE_COLLECTION};

/// Descending `createdAt` index shared by every content collection
fn created_at_index() -> (Document, Option<IndexOptions>) {
    (
        doc! { "createdAt": -1 },
        Some(
            IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build(),
        ),
    )
}
