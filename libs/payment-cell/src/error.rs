use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Stripe API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Failed to parse Stripe API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Stripe secret key is not configured")]
    NotConfigured,

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidPrice(_) => AppError::BadRequest(err.to_string()),
            PaymentError::Store(e) => e.into(),
            PaymentError::NotConfigured => AppError::Internal(err.to_string()),
            PaymentError::Request(_) | PaymentError::Api { .. } | PaymentError::Parse(_) => {
                AppError::ExternalService(err.to_string())
            }
        }
    }
}
