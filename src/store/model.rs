//! Wire-level records returned by the store
//!
//! Identifiers are opaque strings; callers never assume a numeric or
//! sequential scheme.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    /// HTML body
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub content: String,
}

/// Partial replacement for a post; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.thumbnail.is_none()
            && self.content.is_none()
    }

    /// Apply the supplied fields onto an existing post
    pub fn apply(&self, post: &mut Post) {
        if let Some(ref title) = self.title {
            post.title = title.clone();
        }
        if let Some(ref description) = self.description {
            post.description = description.clone();
        }
        if let Some(ref thumbnail) = self.thumbnail {
            post.thumbnail = thumbnail.clone();
        }
        if let Some(ref content) = self.content {
            post.content = content.clone();
        }
    }
}

/// Short attributed text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    pub content: String,
    pub author: String,
}

/// Timestamped free-text entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLog {
    pub title: String,
    pub content: String,
}
