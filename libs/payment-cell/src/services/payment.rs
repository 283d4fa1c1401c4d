use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use shared_database::{collections, AppContext, Collection, Document, Filter};
use shared_models::store::InsertOneResult;

use crate::error::PaymentError;
use crate::models::{Payment, PaymentIntentResponse, PriceInput};
use crate::services::stripe::StripeClient;

pub struct PaymentService {
    stripe: StripeClient,
    currency: String,
    payments: Collection<Payment>,
    bookings: Collection<Value>,
}

impl PaymentService {
    pub fn new(ctx: &Arc<AppContext>) -> Self {
        Self {
            stripe: StripeClient::new(&ctx.config),
            currency: ctx.config.payment_currency.clone(),
            payments: ctx.collection(collections::PAYMENTS),
            bookings: ctx.collection(collections::BOOKINGS),
        }
    }

    pub async fn create_intent(&self, price: Option<&PriceInput>) -> Result<PaymentIntentResponse, PaymentError> {
        let price = price.ok_or_else(|| PaymentError::InvalidPrice("price is required".to_string()))?;
        let amount = price.minor_units()?;

        let intent = self.stripe.create_payment_intent(amount, &self.currency).await?;

        Ok(PaymentIntentResponse {
            client_secret: intent.client_secret,
        })
    }

    /// Stores the receipt, then marks its booking paid. The two writes are
    /// independent; a booking that cannot be matched only logs a warning.
    pub async fn record_payment(&self, mut payment: Payment) -> Result<InsertOneResult, PaymentError> {
        payment.id = None;
        let result = self.payments.insert_one(&payment).await?;

        let mut set = Document::new();
        set.insert("paid".to_string(), Value::Bool(true));
        set.insert("transactionId".to_string(), Value::String(payment.transaction_id.clone()));

        let update = self
            .bookings
            .update_one(&Filter::by_id(&payment.booking_id), set, false)
            .await?;

        if update.matched_count == 0 {
            warn!(
                "Payment {} recorded but booking {} was not found",
                result.inserted_id, payment.booking_id
            );
        } else {
            info!("Booking {} paid with {}", payment.booking_id, payment.transaction_id);
        }

        Ok(result)
    }
}
