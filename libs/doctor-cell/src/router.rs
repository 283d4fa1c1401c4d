use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use shared_database::AppContext;
use shared_utils::extractor::{admin_middleware, auth_middleware};

use crate::handlers;

pub fn doctor_routes(state: Arc<AppContext>) -> Router {
    // Every doctor operation is admin only
    Router::new()
        .route("/doctors", get(handlers::list_doctors).post(handlers::add_doctor))
        .route("/doctors/{id}", delete(handlers::remove_doctor))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
