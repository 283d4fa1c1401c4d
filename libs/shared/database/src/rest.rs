use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::store::{DeleteResult, InsertOneResult, UpdateResult};

use crate::document::{document_id, Document, Filter, ID_FIELD};
use crate::error::StoreError;
use crate::store::DocumentStore;

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Store backed by a PostgREST-style document API, one table per
/// collection under `/rest/v1/`.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.database_url.trim_end_matches('/').to_string(),
            api_key: config.database_api_key.clone(),
        }
    }

    fn get_headers(&self, prefer: Option<&'static str>) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| StoreError::InvalidDocument("database API key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| StoreError::InvalidDocument("database API key is not a valid header value".to_string()))?;

        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(prefer) = prefer {
            headers.insert("Prefer", HeaderValue::from_static(prefer));
        }

        Ok(headers)
    }

    async fn request<T>(
        &self,
        method: Method,
        collection: &str,
        query: &[(String, String)],
        body: Option<Value>,
        prefer: Option<&'static str>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/rest/v1/{}", self.base_url, collection);
        debug!("Making {} request to {} {:?}", method, url, query);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(prefer)?)
            .query(query);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store API error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::CONFLICT => StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    key: error_text,
                },
                _ => StoreError::Api {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

/// Renders a filter in PostgREST's `column=op.value` syntax.
pub fn filter_query(filter: &Filter) -> Vec<(String, String)> {
    filter
        .conditions()
        .iter()
        .map(|(field, value)| {
            let condition = match value {
                Value::Null => "is.null".to_string(),
                Value::String(s) => format!("eq.{}", s),
                other => format!("eq.{}", other),
            };
            (field.clone(), condition)
        })
        .collect()
}

/// PATCH and DELETE without conditions hit every row of the table.
fn scoped_filter_query(filter: &Filter) -> Result<Vec<(String, String)>, StoreError> {
    if filter.is_empty() {
        return Err(StoreError::InvalidDocument("refusing an unfiltered write".to_string()));
    }
    Ok(filter_query(filter))
}

fn with_id(mut document: Document) -> Result<(String, Document), StoreError> {
    let id = match document.get(ID_FIELD) {
        None | Some(Value::Null) => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
        Some(Value::String(id)) => id.clone(),
        Some(other) => {
            return Err(StoreError::InvalidDocument(format!("_id must be a string, found {}", other)));
        }
    };
    Ok((id, document))
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        projection: Option<&[&str]>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut query = filter_query(filter);
        if let Some(fields) = projection {
            let mut columns = vec![ID_FIELD];
            columns.extend(fields.iter().copied().filter(|field| *field != ID_FIELD));
            query.push(("select".to_string(), columns.join(",")));
        }

        self.request(Method::GET, collection, &query, None, None).await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let mut query = filter_query(filter);
        query.push(("limit".to_string(), "1".to_string()));

        let result: Vec<Document> = self.request(Method::GET, collection, &query, None, None).await?;
        Ok(result.into_iter().next())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult, StoreError> {
        let (id, document) = with_id(document)?;

        let result: Vec<Document> = self
            .request(Method::POST, collection, &[], Some(Value::Object(document)), Some(RETURN_REPRESENTATION))
            .await?;

        let inserted_id = result
            .first()
            .and_then(document_id)
            .map(str::to_string)
            .unwrap_or(id);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError> {
        let query = scoped_filter_query(filter)?;
        let updated: Vec<Document> = self
            .request(Method::PATCH, collection, &query, Some(Value::Object(set.clone())), Some(RETURN_REPRESENTATION))
            .await?;

        if !updated.is_empty() || !upsert {
            let matched = updated.len() as u64;
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: matched,
                modified_count: matched,
                upserted_id: None,
            });
        }

        let mut document: Document = filter
            .conditions()
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        document.extend(set);
        let (id, document) = with_id(document)?;

        let _: Vec<Document> = self
            .request(Method::POST, collection, &[], Some(Value::Object(document)), Some(MERGE_DUPLICATES))
            .await?;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<DeleteResult, StoreError> {
        let query = scoped_filter_query(filter)?;
        let deleted: Vec<Document> = self
            .request(Method::DELETE, collection, &query, None, Some(RETURN_REPRESENTATION))
            .await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted.len() as u64,
        })
    }

    async fn create_unique_index(&self, collection: &str, fields: &[&str]) -> Result<(), StoreError> {
        // Constraints live in the database schema.
        debug!("Unique index on {} ({}) expected from the remote schema", collection, fields.join(", "));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_query() {
        let filter = Filter::all()
            .eq("email", "a@example.com")
            .eq("paid", true)
            .eq("role", Value::Null);

        assert_eq!(
            filter_query(&filter),
            vec![
                ("email".to_string(), "eq.a@example.com".to_string()),
                ("paid".to_string(), "eq.true".to_string()),
                ("role".to_string(), "is.null".to_string()),
            ]
        );
    }

    #[test]
    fn test_with_id_keeps_existing() {
        let document = json!({ "_id": "b1" }).as_object().cloned().unwrap();
        let (id, _) = with_id(document).unwrap();
        assert_eq!(id, "b1");
    }

    #[test]
    fn test_with_id_rejects_non_string() {
        let document = json!({ "_id": 7 }).as_object().cloned().unwrap();
        assert!(with_id(document).is_err());
    }
}
