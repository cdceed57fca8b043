//! MongoDB-backed content store

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};
use tracing::debug;

use super::model::{Log, NewLog, NewPost, NewQuote, Post, PostPatch, Quote};
use super::ContentStore;
use crate::db::schemas::{
    AuthKeyDoc, LogDoc, PostDoc, QuoteDoc, AUTH_COLLECTION, LOG_COLLECTION, POST_COLLECTION,
    QUOTE_COLLECTION,
};
use crate::db::{MongoClient, MongoCollection};
use crate::types::Result;

/// Content store over one MongoDB collection per entity kind
pub struct MongoContentStore {
    posts: MongoCollection<PostDoc>,
    quotes: MongoCollection<QuoteDoc>,
    logs: MongoCollection<LogDoc>,
    auth: MongoCollection<AuthKeyDoc>,
}

impl MongoContentStore {
    /// Open every collection and apply its indexes
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        debug!("Opening content collections in '{}'", mongo.db_name());
        Ok(Self {
            posts: mongo.collection(POST_COLLECTION).await?,
            quotes: mongo.collection(QUOTE_COLLECTION).await?,
            logs: mongo.collection(LOG_COLLECTION).await?,
            auth: mongo.collection(AUTH_COLLECTION).await?,
        })
    }
}

/// A string that is not an ObjectId can never match a stored record
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

#[async_trait]
impl ContentStore for MongoContentStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let docs = self.posts.find_newest_first(doc! {}).await?;
        Ok(docs.into_iter().map(PostDoc::into_post).collect())
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let doc = self.posts.find_one(doc! { "_id": oid }).await?;
        Ok(doc.map(PostDoc::into_post))
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let (oid, mut stored) = self.posts.insert_one(PostDoc::new(post)).await?;
        stored._id = Some(oid);
        debug!(id = %oid, "post inserted");
        Ok(stored.into_post())
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<Option<Post>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let filter = doc! { "_id": oid };

        if patch.is_empty() {
            return Ok(self.posts.find_one(filter).await?.map(PostDoc::into_post));
        }

        // PostPatch skips unset fields, so only supplied ones reach $set
        let fields = bson::to_document(&patch)?;
        let doc = self.posts.set_one(filter, fields).await?;
        Ok(doc.map(PostDoc::into_post))
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        self.posts.delete_one(doc! { "_id": oid }).await
    }

    async fn list_quotes(&self) -> Result<Vec<Quote>> {
        let docs = self.quotes.find_newest_first(doc! {}).await?;
        Ok(docs.into_iter().map(QuoteDoc::into_quote).collect())
    }

    async fn create_quote(&self, quote: NewQuote) -> Result<Quote> {
        let (oid, mut stored) = self.quotes.insert_one(QuoteDoc::new(quote)).await?;
        stored._id = Some(oid);
        Ok(stored.into_quote())
    }

    async fn delete_quote(&self, id: &str) -> Result<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        self.quotes.delete_one(doc! { "_id": oid }).await
    }

    async fn list_logs(&self) -> Result<Vec<Log>> {
        let docs = self.logs.find_newest_first(doc! {}).await?;
        Ok(docs.into_iter().map(LogDoc::into_log).collect())
    }

    async fn create_log(&self, log: NewLog) -> Result<Log> {
        let (oid, mut stored) = self.logs.insert_one(LogDoc::new(log)).await?;
        stored._id = Some(oid);
        Ok(stored.into_log())
    }

    async fn auth_key(&self) -> Result<Option<String>> {
        Ok(self.auth.find_one(doc! {}).await?.map(|doc| doc.key))
    }

    async fn seed_auth_key(&self, key: &str) -> Result<()> {
        self.auth
            .insert_if_absent(doc! { "key": key }, doc! { "createdAt": DateTime::now() })
            .await
    }
}
