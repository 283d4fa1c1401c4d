use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use shared_models::auth::{AccessClaims, AuthUser};

/// Lifetime of tokens issued by `/jwt`.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

pub fn issue_token(email: &str, secret: &str) -> Result<String, String> {
    issue_token_with_ttl(email, secret, Duration::seconds(TOKEN_TTL_SECONDS))
}

pub fn issue_token_with_ttl(email: &str, secret: &str, ttl: Duration) -> Result<String, String> {
    if secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let claims = AccessClaims {
        email: email.to_string(),
        iat: now.timestamp().max(0) as u64,
        exp: (now + ttl).timestamp().max(0) as u64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {}", e))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthUser, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expired".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
            _ => "Invalid token format".to_string(),
        }
    })?;

    debug!("Token validated successfully for: {}", data.claims.email);
    Ok(AuthUser::from(data.claims))
}
