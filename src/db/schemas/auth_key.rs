//! Auth key document schema
//!
//! Single-record collection holding the shared admin secret.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{CreatedAt, IntoIndexes};

/// Collection name for the auth key
pub const AUTH_COLLECTION: &str = "auth";

/// Auth key document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthKeyDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// The secret value
    pub key: String,

    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

impl IntoIndexes for AuthKeyDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "key": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("key_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl CreatedAt for AuthKeyDoc {
    fn set_created_at(&mut self, at: DateTime) {
        self.created_at = Some(at);
    }
}
