use std::sync::Arc;

use axum::{routing::post, Router};

use shared_database::AppContext;

use crate::handlers;

pub fn payment_routes(state: Arc<AppContext>) -> Router {
    Router::new()
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route("/payments", post(handlers::record_payment))
        .with_state(state)
}
