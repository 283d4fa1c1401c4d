use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use shared_database::AppContext;
use shared_models::error::AppError;
use shared_utils::extractor::EmailQuery;

use crate::models::{
    AppointmentService, Booking, BookingOutcome, DateQuery, Info, ServiceAvailability, Specialty,
};
use crate::services::{AvailabilityService, BookingService, CatalogService};

#[axum::debug_handler]
pub async fn list_infos(State(ctx): State<Arc<AppContext>>) -> Result<Json<Vec<Info>>, AppError> {
    let infos = CatalogService::new(&ctx).list_infos().await?;
    Ok(Json(infos))
}

#[axum::debug_handler]
pub async fn list_appointment_services(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<AppointmentService>>, AppError> {
    let services = AvailabilityService::new(&ctx)
        .list_with_availability(query.date.as_deref())
        .await?;
    Ok(Json(services))
}

#[axum::debug_handler]
pub async fn get_appointment_service(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentService>, AppError> {
    let service = CatalogService::new(&ctx).get_service(&id).await?;
    Ok(Json(service))
}

#[axum::debug_handler]
pub async fn list_appointment_services_v2(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<ServiceAvailability>>, AppError> {
    let date = query
        .date
        .ok_or_else(|| AppError::BadRequest("date query parameter is required".to_string()))?;

    let availability = AvailabilityService::new(&ctx).availability_by_pipeline(&date).await?;
    Ok(Json(availability))
}

#[axum::debug_handler]
pub async fn list_specialties(State(ctx): State<Arc<AppContext>>) -> Result<Json<Vec<Specialty>>, AppError> {
    let specialties = CatalogService::new(&ctx).list_specialties().await?;
    Ok(Json(specialties))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = BookingService::new(&ctx).list_for_email(query.email.as_deref()).await?;
    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = BookingService::new(&ctx).get_booking(&id).await?;
    Ok(Json(booking))
}

// Guarded by auth + self access in the router
#[axum::debug_handler]
pub async fn create_booking(
    State(ctx): State<Arc<AppContext>>,
    Json(booking): Json<Booking>,
) -> Result<Json<BookingOutcome>, AppError> {
    debug!("Booking request for {} on {}", booking.service_name, booking.appointment_date);

    let outcome = BookingService::new(&ctx).create_booking(booking).await?;
    Ok(Json(outcome))
}
