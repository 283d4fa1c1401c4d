use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::store::{DeleteResult, InsertOneResult, UpdateResult};

use crate::document::{document_id, project, Document, Filter, ID_FIELD};
use crate::error::StoreError;
use crate::store::DocumentStore;

/// Process-local store used when no remote database is configured and by
/// the test suites.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

#[derive(Debug, Default)]
struct MemoryCollection {
    documents: Vec<Document>,
    unique_indexes: Vec<Vec<String>>,
}

impl MemoryCollection {
    /// Finds an index whose key `candidate` shares with a document other
    /// than the one at `skip`.
    fn violated_index(&self, candidate: &Document, skip: Option<usize>) -> Option<String> {
        let candidate_id = document_id(candidate);
        let id_clash = self
            .documents
            .iter()
            .enumerate()
            .any(|(pos, existing)| Some(pos) != skip && candidate_id.is_some() && document_id(existing) == candidate_id);
        if id_clash {
            return Some(ID_FIELD.to_string());
        }

        self.unique_indexes
            .iter()
            .find(|fields| {
                let key = index_key(candidate, fields);
                // Sparse: documents without any key field are not indexed
                if key.iter().all(Value::is_null) {
                    return false;
                }
                self.documents
                    .iter()
                    .enumerate()
                    .any(|(pos, existing)| Some(pos) != skip && index_key(existing, fields) == key)
            })
            .map(|fields| fields.join(", "))
    }
}

fn index_key(document: &Document, fields: &[String]) -> Vec<Value> {
    fields
        .iter()
        .map(|field| document.get(field).cloned().unwrap_or(Value::Null))
        .collect()
}

fn ensure_id(document: &mut Document) -> Result<String, StoreError> {
    match document.get(ID_FIELD) {
        None | Some(Value::Null) => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Err(StoreError::InvalidDocument(format!("_id must be a string, found {}", other))),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `documents` in order, stopping at the first failure.
    pub async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<InsertOneResult>, StoreError> {
        let mut results = Vec::with_capacity(documents.len());
        for document in documents {
            results.push(self.insert_one(collection, document).await?);
        }
        Ok(results)
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |c| c.documents.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        projection: Option<&[&str]>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(stored) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(stored
            .documents
            .iter()
            .filter(|document| filter.matches(document))
            .map(|document| match projection {
                Some(fields) => project(document, fields),
                None => document.clone(),
            })
            .collect())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<InsertOneResult, StoreError> {
        let id = ensure_id(&mut document)?;

        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();
        if let Some(key) = stored.violated_index(&document, None) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                key,
            });
        }

        stored.documents.push(document);
        debug!("Inserted {} into {}", id, collection);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();

        let Some(pos) = stored.documents.iter().position(|document| filter.matches(document)) else {
            if !upsert {
                return Ok(UpdateResult {
                    acknowledged: true,
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: None,
                });
            }

            let mut document: Document = filter
                .conditions()
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            document.extend(set);
            let id = ensure_id(&mut document)?;
            if let Some(key) = stored.violated_index(&document, None) {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    key,
                });
            }
            stored.documents.push(document);
            debug!("Upserted {} into {}", id, collection);

            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_id: Some(id),
            });
        };

        let mut updated = stored.documents[pos].clone();
        let mut changed = false;
        for (field, value) in set {
            if updated.get(&field) != Some(&value) {
                updated.insert(field, value);
                changed = true;
            }
        }

        if changed {
            if let Some(key) = stored.violated_index(&updated, Some(pos)) {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    key,
                });
            }
            stored.documents[pos] = updated;
        }

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(changed),
            upserted_id: None,
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<DeleteResult, StoreError> {
        let mut collections = self.collections.write().await;
        let deleted = match collections.get_mut(collection) {
            Some(stored) => match stored.documents.iter().position(|document| filter.matches(document)) {
                Some(pos) => {
                    stored.documents.remove(pos);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    async fn create_unique_index(&self, collection: &str, fields: &[&str]) -> Result<(), StoreError> {
        let fields: Vec<String> = fields.iter().map(|field| field.to_string()).collect();
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();

        if !stored.unique_indexes.contains(&fields) {
            debug!("Creating unique index on {} ({})", collection, fields.join(", "));
            stored.unique_indexes.push(fields);
        }
        Ok(())
    }
}
