use async_trait::async_trait;

use shared_models::store::{DeleteResult, InsertOneResult, UpdateResult};

use crate::document::{Document, Filter};
use crate::error::StoreError;
use crate::pipeline::Pipeline;

/// Document store seam shared by every cell.
///
/// Implementations must be safe to share across concurrently running
/// requests; no method holds state between calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of `collection` matching `filter`, in insertion order.
    /// With a projection only the listed fields and `_id` are returned.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        projection: Option<&[&str]>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError> {
        Ok(self.find(collection, filter, None).await?.into_iter().next())
    }

    /// Stores `document`, generating an `_id` when it has none.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult, StoreError>;

    /// Applies `set` to the first document matching `filter`. With `upsert`
    /// and no match, inserts the filter's equality fields merged with `set`.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<DeleteResult, StoreError>;

    /// Rejects later writes that would give two documents the same values
    /// for `fields`.
    async fn create_unique_index(&self, collection: &str, fields: &[&str]) -> Result<(), StoreError>;

    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Document>, StoreError> {
        pipeline.run(self, collection).await
    }
}
