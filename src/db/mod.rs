//! Database layer
//!
//! MongoDB client, typed collections and the document schemas for every
//! entity kind.

pub mod mongo;
pub mod schemas;

pub use mongo::{MongoClient, MongoCollection};
pub use schemas::{AuthKeyDoc, LogDoc, PostDoc, QuoteDoc};
