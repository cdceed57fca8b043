//! Log document schema

use bson::{oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use super::created_at_index;
use crate::db::mongo::{CreatedAt, IntoIndexes};
use crate::store::{Log, NewLog};

pub const LOG_COLLECTION: &str = "logs";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LogDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    pub title: String,

    pub content: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
}

impl LogDoc {
    pub fn new(log: NewLog) -> Self {
        Self {
            _id: None,
            title: log.title,
            content: log.content,
            created_at: DateTime::now(),
        }
    }

    pub fn into_log(self) -> Log {
        Log {
            id: self._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            title: self.title,
            content: self.content,
            created_at: self.created_at.to_chrono(),
        }
    }
}

impl IntoIndexes for LogDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![created_at_index()]
    }
}

impl CreatedAt for LogDoc {
    fn set_created_at(&mut self, at: DateTime) {
        self.created_at = at;
    }
}
