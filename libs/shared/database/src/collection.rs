use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use shared_models::store::{DeleteResult, InsertOneResult, UpdateResult};

use crate::document::{Document, Filter};
use crate::error::StoreError;
use crate::pipeline::Pipeline;
use crate::store::DocumentStore;

/// Typed view of one collection. Documents are decoded into `T` on the way
/// out and encoded from `T` on the way in, so shape errors surface here and
/// never at use sites.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name,
            _record: PhantomData,
        }
    }
}

pub fn decode<R: DeserializeOwned>(document: Document) -> Result<R, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub fn encode<R: Serialize>(record: &R) -> Result<Document, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::InvalidDocument(format!("expected an object, found {}", other))),
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _record: PhantomData,
        }
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        self.store
            .find(self.name, filter, None)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Like [`Collection::find`] but lets the store drop every field not in
    /// `fields`, decoding into a narrower record `P`.
    pub async fn find_projected<P>(&self, filter: &Filter, fields: &[&str]) -> Result<Vec<P>, StoreError>
    where
        P: DeserializeOwned,
    {
        self.store
            .find(self.name, filter, Some(fields))
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>, StoreError> {
        self.store
            .find_one(self.name, filter)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn insert_one(&self, record: &T) -> Result<InsertOneResult, StoreError> {
        self.store.insert_one(self.name, encode(record)?).await
    }

    pub async fn update_one(&self, filter: &Filter, set: Document, upsert: bool) -> Result<UpdateResult, StoreError> {
        self.store.update_one(self.name, filter, set, upsert).await
    }

    pub async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult, StoreError> {
        self.store.delete_one(self.name, filter).await
    }

    pub async fn aggregate<P>(&self, pipeline: &Pipeline) -> Result<Vec<P>, StoreError>
    where
        P: DeserializeOwned,
    {
        self.store
            .aggregate(self.name, pipeline)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}
