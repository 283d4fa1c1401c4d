use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PaymentError;

/// Prices arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    pub fn value(&self) -> Result<f64, PaymentError> {
        match self {
            PriceInput::Number(n) => Ok(*n),
            PriceInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| PaymentError::InvalidPrice(s.clone())),
        }
    }

    /// Whole cents, rounded to the nearest one.
    pub fn minor_units(&self) -> Result<i64, PaymentError> {
        let price = self.value()?;
        if !price.is_finite() || price < 0.0 {
            return Err(PaymentError::InvalidPrice(price.to_string()));
        }
        Ok((price * 100.0).round() as i64)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentRequest {
    pub price: Option<PriceInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// The slice of Stripe's PaymentIntent object the portal reads.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub booking_id: String,
    pub transaction_id: String,
    /// Amount, payer email and the rest of the client receipt.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
