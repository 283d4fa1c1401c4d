use std::sync::Arc;

use chrono::Duration;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::{collections, AppContext, Document, MemoryStore};
use shared_models::store::InsertOneResult;

use crate::jwt::issue_token_with_ttl;

pub struct TestConfig {
    pub jwt_secret: String,
    pub database_url: String,
    pub stripe_api_base: String,
    pub stripe_secret_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            database_url: String::new(),
            stripe_api_base: "http://localhost:12111".to_string(),
            stripe_secret_key: "sk_test_portal".to_string(),
        }
    }
}

impl TestConfig {
    /// Points payment-gateway calls at a mock server.
    pub fn with_stripe_api_base(mut self, base: &str) -> Self {
        self.stripe_api_base = base.to_string();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.clone(),
            database_api_key: "test-api-key".to_string(),
            access_token_secret: self.jwt_secret.clone(),
            stripe_secret_key: self.stripe_secret_key.clone(),
            stripe_api_base: self.stripe_api_base.clone(),
            payment_currency: "usd".to_string(),
            port: 5000,
        }
    }
}

pub struct TestUser {
    pub email: String,
    pub role: Option<String>,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::patient("test@example.com")
    }
}

impl TestUser {
    pub fn patient(email: &str) -> Self {
        Self {
            email: email.to_string(),
            role: None,
        }
    }

    pub fn admin(email: &str) -> Self {
        Self {
            email: email.to_string(),
            role: Some("admin".to_string()),
        }
    }

    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert("email".to_string(), json!(self.email));
        document.insert("name".to_string(), json!("Test User"));
        if let Some(role) = &self.role {
            document.insert("role".to_string(), json!(role));
        }
        document
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        issue_token_with_ttl(&user.email, secret, Duration::hours(exp_hours.unwrap_or(1)))
            .expect("test secret is not empty")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(1))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// An [`AppContext`] over a fresh [`MemoryStore`] that tests can seed and
/// inspect directly.
pub struct TestContext {
    pub config: TestConfig,
    pub store: Arc<MemoryStore>,
    pub ctx: Arc<AppContext>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new(TestConfig::default())
    }
}

impl TestContext {
    pub fn new(config: TestConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let ctx = Arc::new(AppContext::new(config.to_app_config(), store.clone()));
        Self { config, store, ctx }
    }

    pub fn token_for(&self, user: &TestUser) -> String {
        JwtTestUtils::create_test_token(user, &self.config.jwt_secret, Some(1))
    }

    pub async fn seed(&self, collection: &str, documents: Vec<Value>) -> Vec<InsertOneResult> {
        let documents = documents
            .into_iter()
            .map(|value| match value {
                Value::Object(document) => document,
                other => panic!("seed documents must be objects, got {}", other),
            })
            .collect();

        self.store
            .insert_many(collection, documents)
            .await
            .expect("seeding the memory store")
    }

    pub async fn seed_user(&self, user: &TestUser) -> String {
        self.store
            .insert_many(collections::USERS, vec![user.to_document()])
            .await
            .expect("seeding a user")
            .remove(0)
            .inserted_id
    }
}

pub struct MockStripeResponses;

impl MockStripeResponses {
    pub fn payment_intent_response(amount: i64, currency: &str) -> Value {
        json!({
            "id": "pi_test_123",
            "object": "payment_intent",
            "amount": amount,
            "currency": currency,
            "client_secret": "pi_test_123_secret_456",
            "payment_method_types": ["card"],
            "status": "requires_payment_method"
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "error": {
                "message": message,
                "code": code,
                "type": "invalid_request_error"
            }
        })
    }
}
