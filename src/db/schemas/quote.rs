//! Quote document schema

use bson::{oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use super::created_at_index;
use crate::db::mongo::{CreatedAt, IntoIndexes};
use crate::store::{NewQuote, Quote};

pub const QUOTE_COLLECTION: &str = "quotes";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QuoteDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    pub content: String,

    pub author: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
}

impl QuoteDoc {
    pub fn new(quote: NewQuote) -> Self {
        Self {
            _id: None,
            content: quote.content,
            author: quote.author,
            created_at: DateTime::now(),
        }
    }

    pub fn into_quote(self) -> Quote {
        Quote {
            id: self._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            content: self.content,
            author: self.author,
            created_at: self.created_at.to_chrono(),
        }
    }
}

impl IntoIndexes for QuoteDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![created_at_index()]
    }
}

impl CreatedAt for QuoteDoc {
    fn set_created_at(&mut self, at: DateTime) {
        self.created_at = at;
    }
}
