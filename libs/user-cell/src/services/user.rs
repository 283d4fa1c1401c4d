use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use shared_database::{collections, AppContext, Collection, Document, Filter};
use shared_models::auth::{User, ADMIN_ROLE};
use shared_models::error::AppError;
use shared_models::store::UpdateResult;

use crate::models::{AdminStatus, RegistrationOutcome};

pub struct UserService {
    users: Collection<User>,
}

impl UserService {
    pub fn new(ctx: &Arc<AppContext>) -> Self {
        Self {
            users: ctx.collection(collections::USERS),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.find(&Filter::all()).await?)
    }

    /// Inserts the user on first sight of its email. Existing records are
    /// left untouched.
    pub async fn register(&self, mut user: User) -> Result<RegistrationOutcome, AppError> {
        let email = user
            .email
            .clone()
            .ok_or_else(|| AppError::BadRequest("email is required".to_string()))?;
        user.id = None;

        if self.users.find_one(&Filter::all().eq("email", email.as_str())).await?.is_some() {
            debug!("User {} already registered", email);
            return Ok(RegistrationOutcome::existing());
        }

        match self.users.insert_one(&user).await {
            Ok(result) => {
                info!("Registered user {}", email);
                Ok(RegistrationOutcome::Created(result))
            }
            Err(e) if e.is_duplicate_key() => Ok(RegistrationOutcome::existing()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn admin_status(&self, email: &str) -> Result<AdminStatus, AppError> {
        let user = self.users.find_one(&Filter::all().eq("email", email)).await?;

        Ok(AdminStatus {
            is_admin: user.is_some_and(|user| user.is_admin()),
        })
    }

    /// Upserts on `_id`, so an unknown id creates a bare admin record.
    pub async fn grant_admin(&self, id: &str) -> Result<UpdateResult, AppError> {
        let mut set = Document::new();
        set.insert("role".to_string(), Value::String(ADMIN_ROLE.to_string()));

        let result = self.users.update_one(&Filter::by_id(id), set, true).await?;
        info!("Granted admin to {} (matched {}, upserted {:?})", id, result.matched_count, result.upserted_id);

        Ok(result)
    }
}
