use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use shared_database::{collections::USERS, AppContext, Filter};
use shared_models::auth::{AccessTokenResponse, User};
use shared_models::error::AppError;
use shared_utils::extractor::EmailQuery;
use shared_utils::jwt::issue_token;

/// Issues a one-hour access token, but only to emails that belong to a
/// known user. Unknown emails get a 401 carrying an empty token.
#[axum::debug_handler]
pub async fn issue_access_token(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<EmailQuery>,
) -> Result<(StatusCode, Json<AccessTokenResponse>), AppError> {
    let Some(email) = query.email else {
        debug!("Token requested without an email");
        return Ok((StatusCode::UNAUTHORIZED, Json(AccessTokenResponse::empty())));
    };

    let user = ctx
        .collection::<User>(USERS)
        .find_one(&Filter::all().eq("email", email.as_str()))
        .await?;

    if user.is_none() {
        debug!("Token requested for unknown user {}", email);
        return Ok((StatusCode::UNAUTHORIZED, Json(AccessTokenResponse::empty())));
    }

    let access_token = issue_token(&email, &ctx.config.access_token_secret).map_err(AppError::Internal)?;
    info!("Issued access token for {}", email);

    Ok((StatusCode::OK, Json(AccessTokenResponse { access_token })))
}
