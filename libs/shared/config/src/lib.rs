use std::env;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_PAYMENT_CURRENCY: &str = "usd";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_api_key: String,
    pub access_token_secret: String,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub payment_currency: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, falling back to the in-memory store");
                    String::new()
                }),
            database_api_key: env::var("DATABASE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_API_KEY not set, using empty value");
                    String::new()
                }),
            access_token_secret: env::var("ACCESS_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("ACCESS_TOKEN not set, using empty value");
                    String::new()
                }),
            stripe_secret_key: env::var("STRIPE_SECRET")
                .unwrap_or_else(|_| {
                    warn!("STRIPE_SECRET not set, using empty value");
                    String::new()
                }),
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.to_string()),
            payment_currency: env::var("PAYMENT_CURRENCY")
                .unwrap_or_else(|_| DEFAULT_PAYMENT_CURRENCY.to_string()),
            port: parse_port(env::var("PORT").ok().as_deref()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.uses_remote_store()
            && !self.access_token_secret.is_empty()
            && !self.stripe_secret_key.is_empty()
    }

    pub fn uses_remote_store(&self) -> bool {
        !self.database_url.is_empty()
    }

    pub fn is_payment_configured(&self) -> bool {
        !self.stripe_secret_key.is_empty() && !self.stripe_api_base.is_empty()
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("PORT value '{}' is not a valid port, using {}", value, DEFAULT_PORT);
            DEFAULT_PORT
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            database_url: "http://localhost:54321".to_string(),
            database_api_key: "key".to_string(),
            access_token_secret: "secret".to_string(),
            stripe_secret_key: "sk_test".to_string(),
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            payment_currency: DEFAULT_PAYMENT_CURRENCY.to_string(),
            port: DEFAULT_PORT,
        }
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(None), 5000);
        assert_eq!(parse_port(Some("8080")), 8080);
        assert_eq!(parse_port(Some(" 3000 ")), 3000);
        assert_eq!(parse_port(Some("not-a-port")), 5000);
        assert_eq!(parse_port(Some("70000")), 5000);
    }

    #[test]
    fn test_is_configured() {
        assert!(config().is_configured());

        let mut missing_store = config();
        missing_store.database_url.clear();
        assert!(!missing_store.is_configured());
        assert!(!missing_store.uses_remote_store());

        let mut missing_secret = config();
        missing_secret.access_token_secret.clear();
        assert!(!missing_secret.is_configured());
    }

    #[test]
    fn test_is_payment_configured() {
        assert!(config().is_payment_configured());

        let mut missing_key = config();
        missing_key.stripe_secret_key.clear();
        assert!(!missing_key.is_payment_configured());
    }
}
