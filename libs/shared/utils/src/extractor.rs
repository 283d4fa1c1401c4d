use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

use shared_database::{collections::USERS, AppContext, Filter};
use shared_models::auth::{AuthUser, User};
use shared_models::error::AppError;

use crate::jwt::validate_token;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access!";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden access!";

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

fn forbidden() -> AppError {
    AppError::Forbidden(FORBIDDEN_MESSAGE.to_string())
}

/// Pulls the token out of `Authorization: Bearer <token>`.
///
/// A missing header is `Unauthorized`; any header that does not carry a
/// bearer token is `Forbidden`.
pub fn extract_bearer_token<B>(request: &Request<B>) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))?;

    let auth_value = auth_header.to_str().map_err(|_| forbidden())?;

    match auth_value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(forbidden()),
    }
}

// Middleware for authentication; never touches the store
pub async fn auth_middleware(
    State(ctx): State<Arc<AppContext>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;

    let user = validate_token(token, &ctx.config.access_token_secret).map_err(|e| {
        debug!("Rejecting request: {}", e);
        forbidden()
    })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

// Function to extract user from request extensions
pub fn extract_user<B>(request: &Request<B>) -> Result<AuthUser, AppError> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))
}

/// The `email` query parameter must name the authenticated caller.
pub fn check_self_access(user: &AuthUser, query: &EmailQuery) -> Result<(), AppError> {
    if query.email.as_deref() != Some(user.email.as_str()) {
        debug!("Query email {:?} does not match token email {}", query.email, user.email);
        return Err(forbidden());
    }
    Ok(())
}

/// Reads `?email=` for the guards. A query that does not parse is a guard
/// failure like any other.
pub fn guard_query<B>(request: &Request<B>) -> Result<EmailQuery, AppError> {
    Query::<EmailQuery>::try_from_uri(request.uri())
        .map(|Query(query)| query)
        .map_err(|e| {
            debug!("Rejecting unparseable guard query: {}", e);
            forbidden()
        })
}

/// A missing user record counts as not elevated.
pub async fn is_admin(ctx: &AppContext, email: &str) -> Result<bool, AppError> {
    let user = ctx
        .collection::<User>(USERS)
        .find_one(&Filter::all().eq("email", email))
        .await?;

    Ok(user.is_some_and(|user| user.is_admin()))
}

// Must run after auth_middleware
pub async fn self_access_middleware(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = extract_user(&request)?;
    check_self_access(&user, &guard_query(&request)?)?;

    Ok(next.run(request).await)
}

// Must run after auth_middleware
pub async fn admin_middleware(
    State(ctx): State<Arc<AppContext>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = extract_user(&request)?;
    check_self_access(&user, &guard_query(&request)?)?;

    if !is_admin(&ctx, &user.email).await? {
        debug!("User {} is not an admin", user.email);
        return Err(forbidden());
    }

    Ok(next.run(request).await)
}
