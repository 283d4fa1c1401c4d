use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::AppContext;

use crate::handlers;

pub fn auth_routes(state: Arc<AppContext>) -> Router {
    Router::new()
        .route("/jwt", get(handlers::issue_access_token))
        .with_state(state)
}
