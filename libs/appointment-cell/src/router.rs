use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppContext;
use shared_utils::extractor::{auth_middleware, self_access_middleware};

use crate::handlers;

pub fn appointment_routes(state: Arc<AppContext>) -> Router {
    // Only booking creation needs a token whose email matches ?email
    let create_booking = post(handlers::create_booking)
        .route_layer(middleware::from_fn(self_access_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/infos", get(handlers::list_infos))
        .route("/appointmentServices", get(handlers::list_appointment_services))
        .route("/appointmentServices/{id}", get(handlers::get_appointment_service))
        .route("/v2/appointmentServices", get(handlers::list_appointment_services_v2))
        .route("/appointmentSpecialty", get(handlers::list_specialties))
        .route("/bookings", get(handlers::list_bookings).merge(create_booking))
        .route("/bookings/{id}", get(handlers::get_booking))
        .with_state(state)
}
