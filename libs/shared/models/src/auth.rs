use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token issued from `/jwt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub email: String,
    pub iat: u64,
    pub exp: u64,
}

/// Identity attached to the request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<AccessClaims> for AuthUser {
    fn from(claims: AccessClaims) -> Self {
        let to_datetime = |secs: u64| {
            i64::try_from(secs)
                .ok()
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        };

        Self {
            issued_at: to_datetime(claims.iat),
            expires_at: to_datetime(claims.exp),
            email: claims.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

impl AccessTokenResponse {
    pub fn empty() -> Self {
        Self { access_token: String::new() }
    }
}

pub const ADMIN_ROLE: &str = "admin";

/// A portal user record. Only `email` and `role` carry meaning; anything
/// else the client sends on first login is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}
