use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_database::{collections, AppContext, Collection, Filter};
use shared_models::error::AppError;

use crate::models::{Booking, BookingOutcome, BookingRejection};

pub struct BookingService {
    bookings: Collection<Booking>,
}

impl BookingService {
    pub fn new(ctx: &Arc<AppContext>) -> Self {
        Self {
            bookings: ctx.collection(collections::BOOKINGS),
        }
    }

    /// No email means no bookings rather than everyone's.
    pub async fn list_for_email(&self, email: Option<&str>) -> Result<Vec<Booking>, AppError> {
        let Some(email) = email else {
            return Ok(Vec::new());
        };

        Ok(self.bookings.find(&Filter::all().eq("email", email)).await?)
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.bookings
            .find_one(&Filter::by_id(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// One booking per (service, date, patient). The unique index on the
    /// bookings collection settles concurrent attempts the lookup misses.
    pub async fn create_booking(&self, mut booking: Booking) -> Result<BookingOutcome, AppError> {
        booking.id = None;
        booking.paid = false;
        booking.transaction_id = None;

        let existing = Filter::all()
            .eq("serviceId", booking.service_id.as_str())
            .eq("appointmentDate", booking.appointment_date.as_str())
            .eq("email", booking.email.as_str());

        if self.bookings.find_one(&existing).await?.is_some() {
            debug!(
                "{} already booked {} on {}",
                booking.email, booking.service_name, booking.appointment_date
            );
            return Ok(BookingOutcome::Rejected(BookingRejection::already_booked(&booking.service_name)));
        }

        match self.bookings.insert_one(&booking).await {
            Ok(result) => {
                info!("Created booking {} for {}", result.inserted_id, booking.email);
                Ok(BookingOutcome::Created(result))
            }
            Err(e) if e.is_duplicate_key() => {
                warn!("Concurrent duplicate booking for {} rejected", booking.email);
                Ok(BookingOutcome::Rejected(BookingRejection::already_booked(&booking.service_name)))
            }
            Err(e) => Err(e.into()),
        }
    }
}
