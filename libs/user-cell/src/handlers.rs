use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use shared_database::AppContext;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::store::UpdateResult;

use crate::models::{AdminStatus, RegistrationOutcome};
use crate::services::UserService;

#[axum::debug_handler]
pub async fn list_users(State(ctx): State<Arc<AppContext>>) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::new(&ctx).list_users().await?;
    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn register_user(
    State(ctx): State<Arc<AppContext>>,
    Json(user): Json<User>,
) -> Result<Json<RegistrationOutcome>, AppError> {
    let outcome = UserService::new(&ctx).register(user).await?;
    Ok(Json(outcome))
}

#[axum::debug_handler]
pub async fn get_admin_status(
    State(ctx): State<Arc<AppContext>>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, AppError> {
    let status = UserService::new(&ctx).admin_status(&email).await?;
    Ok(Json(status))
}

#[axum::debug_handler]
pub async fn grant_admin(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let result = UserService::new(&ctx).grant_admin(&id).await?;
    Ok(Json(result))
}
