use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::error::PaymentError;
use crate::models::StripePaymentIntent;

pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
    enabled: bool,
}

impl StripeClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.stripe_api_base.trim_end_matches('/').to_string(),
            secret_key: config.stripe_secret_key.clone(),
            enabled: config.is_payment_configured(),
        }
    }

    /// Creates a card-only PaymentIntent for `amount` minor units.
    pub async fn create_payment_intent(&self, amount: i64, currency: &str) -> Result<StripePaymentIntent, PaymentError> {
        if !self.enabled {
            return Err(PaymentError::NotConfigured);
        }

        let api_url = format!("{}/v1/payment_intents", self.api_base);
        let form_body = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        debug!("Creating payment intent for {} {}", amount, currency);

        let response = self
            .client
            .post(&api_url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<Value>(&body_text) {
                Ok(json_body) => json_body
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .unwrap_or(&body_text)
                    .to_string(),
                Err(_) => body_text,
            };
            return Err(PaymentError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let intent: StripePaymentIntent = serde_json::from_str(&body_text)?;
        info!("Created payment intent {}", intent.id);
        Ok(intent)
    }
}
