use serde::{Deserialize, Serialize};

use shared_models::store::InsertOneResult;

pub const USER_ALREADY_ADDED: &str = "User already added";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub message: String,
}

/// Result of the first-login registration: a fresh insert, or a note that
/// the email is already known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistrationOutcome {
    Created(InsertOneResult),
    Existing(UserMessage),
}

impl RegistrationOutcome {
    pub fn existing() -> Self {
        Self::Existing(UserMessage {
            message: USER_ALREADY_ADDED.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    pub is_admin: bool,
}
