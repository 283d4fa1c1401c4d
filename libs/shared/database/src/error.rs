use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Duplicate key in {collection}: {key}")]
    DuplicateKey { collection: String, key: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl StoreError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Database(err.to_string())
    }
}
