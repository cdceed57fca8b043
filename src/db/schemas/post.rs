//! Post document schema

use bson::{oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use super::created_at_index;
use crate::db::mongo::{CreatedAt, IntoIndexes};
use crate::store::{NewPost, Post};

/// Collection name for posts. Kept as `content` for existing data.
pub const POST_COLLECTION: &str = "content";

/// Post document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    pub title: String,

    pub description: String,

    pub thumbnail: String,

    /// HTML body
    pub content: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
}

impl PostDoc {
    pub fn new(post: NewPost) -> Self {
        Self {
            _id: None,
            title: post.title,
            description: post.description,
            thumbnail: post.thumbnail,
            content: post.content,
            created_at: DateTime::now(),
        }
    }

    /// Convert to the wire record
    pub fn into_post(self) -> Post {
        Post {
            id: self._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            title: self.title,
            description: self.description,
            thumbnail: self.thumbnail,
            content: self.content,
            created_at: self.created_at.to_chrono(),
        }
    }
}

impl IntoIndexes for PostDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![created_at_index()]
    }
}

impl CreatedAt for PostDoc {
    fn set_created_at(&mut self, at: DateTime) {
        self.created_at = at;
    }
}
