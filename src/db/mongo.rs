//! MongoDB client and collection wrapper

use bson::{doc, oid::ObjectId, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{
    options::{IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::types::GatewayError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Trait for schemas carrying a server-assigned creation time
pub trait CreatedAt {
    fn set_created_at(&mut self, at: DateTime);
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, GatewayError> {
        info!("Connecting to MongoDB at {}", redact_uri(uri));

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let after_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
        let separator = if uri.contains('?') {
            "&"
        } else if after_scheme.contains('/') {
            "?"
        } else {
            "/?"
        };
        let timeout_uri = format!(
            "{}{}serverSelectionTimeoutMS=3000&connectTimeoutMS=3000",
            uri, separator
        );

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| GatewayError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| GatewayError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, GatewayError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + CreatedAt,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Strip credentials from a connection string before logging it
fn redact_uri(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &uri[..scheme_end], &uri[at + 1..])
        }
        _ => uri.to_string(),
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + CreatedAt,
{
    /// Create a new collection and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, GatewayError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<(), GatewayError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| GatewayError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document, stamping its creation time.
    ///
    /// Returns the stored document with its assigned `_id`.
    pub async fn insert_one(&self, mut item: T) -> Result<(ObjectId, T), GatewayError> {
        item.set_created_at(DateTime::now());

        let result = self
            .inner
            .insert_one(&item)
            .await
            .map_err(|e| GatewayError::Database(format!("Insert failed: {}", e)))?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| GatewayError::Database("Failed to get inserted ID".into()))?;

        Ok((id, item))
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, GatewayError> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| GatewayError::Database(format!("Find failed: {}", e)))
    }

    /// Find all matching documents, most recently created first
    pub async fn find_newest_first(&self, filter: Document) -> Result<Vec<T>, GatewayError> {
        let cursor = self
            .inner
            .find(filter)
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await
            .map_err(|e| GatewayError::Database(format!("Find failed: {}", e)))?;

        cursor
            .try_collect::<Vec<T>>()
            .await
            .map_err(|e| GatewayError::Database(format!("Cursor read failed: {}", e)))
    }

    /// Apply `$set` to one document and return it after the change
    pub async fn set_one(&self, filter: Document, fields: Document) -> Result<Option<T>, GatewayError> {
        self.inner
            .find_one_and_update(filter, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| GatewayError::Database(format!("Update failed: {}", e)))
    }

    /// Insert `fields` only when nothing matches `filter`
    pub async fn insert_if_absent(&self, filter: Document, fields: Document) -> Result<(), GatewayError> {
        self.inner
            .update_one(filter, doc! { "$setOnInsert": fields })
            .upsert(true)
            .await
            .map_err(|e| GatewayError::Database(format!("Upsert failed: {}", e)))?;
        Ok(())
    }

    /// Hard delete one document; `true` if something was removed
    pub async fn delete_one(&self, filter: Document) -> Result<bool, GatewayError> {
        let result = self
            .inner
            .delete_one(filter)
            .await
            .map_err(|e| GatewayError::Database(format!("Delete failed: {}", e)))?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Collection operations need a running MongoDB instance and are not
    // covered here.

    #[test]
    fn test_redact_uri() {
        assert_eq!(
            redact_uri("mongodb+srv://admin:pw@cluster0.example.net/jaat"),
            "mongodb+srv://***@cluster0.example.net/jaat"
        );
        assert_eq!(
            redact_uri("mongodb://localhost:27017"),
            "mongodb://localhost:27017"
        );
    }
}
