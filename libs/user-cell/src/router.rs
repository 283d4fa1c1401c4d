use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_database::AppContext;
use shared_utils::extractor::{admin_middleware, auth_middleware};

use crate::handlers;

pub fn user_routes(state: Arc<AppContext>) -> Router {
    let list_users = get(handlers::list_users)
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let grant_admin = put(handlers::grant_admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/users", list_users.merge(post(handlers::register_user)))
        // GET takes an email, PUT a user id
        .route("/users/admin/{target}", get(handlers::get_admin_status).merge(grant_admin))
        .with_state(state)
}
