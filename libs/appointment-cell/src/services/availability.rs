//! Remaining-slot computation for appointment services.
//!
//! Two equivalent variants exist. The in-process one loads services and the
//! bookings of one date and subtracts booked slots per service id. The
//! pipeline one joins bookings on service name through the store's
//! aggregation support. Both keep the catalog order of the remaining slots.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use shared_database::{collections, AppContext, Collection, Filter, Lookup, Pipeline, Projection, ID_FIELD};
use shared_models::error::AppError;

use crate::models::{AppointmentService, Booking, ServiceAvailability};

/// Slots of `catalog` not in `booked`, first occurrence order, no repeats.
pub fn remaining_slots<'a, I>(catalog: &[String], booked: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let booked: HashSet<&str> = booked.into_iter().collect();
    let mut seen = HashSet::new();

    catalog
        .iter()
        .filter(|slot| !booked.contains(slot.as_str()) && seen.insert(slot.as_str()))
        .cloned()
        .collect()
}

/// Replaces each service's slots with the ones not taken by `bookings`.
pub fn apply_availability(services: Vec<AppointmentService>, bookings: &[Booking]) -> Vec<AppointmentService> {
    let mut booked_by_service: HashMap<&str, Vec<&str>> = HashMap::new();
    for booking in bookings {
        booked_by_service
            .entry(booking.service_id.as_str())
            .or_default()
            .push(booking.slot.as_str());
    }

    services
        .into_iter()
        .map(|mut service| {
            let booked = service
                .id
                .as_deref()
                .and_then(|id| booked_by_service.get(id))
                .cloned()
                .unwrap_or_default();
            service.slots = remaining_slots(&service.slots, booked);
            service
        })
        .collect()
}

pub fn availability_pipeline(date: &str) -> Pipeline {
    Pipeline::new()
        .lookup(Lookup {
            from: collections::BOOKINGS.to_string(),
            local_field: "name".to_string(),
            foreign_field: "serviceName".to_string(),
            filter: Filter::all().eq("appointmentDate", date),
            as_field: "booked".to_string(),
        })
        .project(vec![
            Projection::Include(ID_FIELD.to_string()),
            Projection::Include("slots".to_string()),
            Projection::Map {
                field: "booked".to_string(),
                input: "booked".to_string(),
                // Older bookings carry their slot as `serviceSlot`
                paths: vec!["slot".to_string(), "serviceSlot".to_string()],
            },
        ])
        .project(vec![
            Projection::Include(ID_FIELD.to_string()),
            Projection::SetDifference {
                field: "slots".to_string(),
                left: "slots".to_string(),
                right: "booked".to_string(),
            },
        ])
}

pub struct AvailabilityService {
    services: Collection<AppointmentService>,
    bookings: Collection<Booking>,
}

impl AvailabilityService {
    pub fn new(ctx: &Arc<AppContext>) -> Self {
        Self {
            services: ctx.collection(collections::APPOINTMENT_SERVICES),
            bookings: ctx.collection(collections::BOOKINGS),
        }
    }

    /// Without a date nothing is subtracted.
    pub async fn list_with_availability(&self, date: Option<&str>) -> Result<Vec<AppointmentService>, AppError> {
        let services = self.services.find(&Filter::all()).await?;

        let Some(date) = date else {
            return Ok(services);
        };

        let bookings = self.bookings.find(&Filter::all().eq("appointmentDate", date)).await?;
        debug!("Computing availability for {} against {} bookings", date, bookings.len());

        Ok(apply_availability(services, &bookings))
    }

    pub async fn availability_by_pipeline(&self, date: &str) -> Result<Vec<ServiceAvailability>, AppError> {
        Ok(self.services.aggregate(&availability_pipeline(date)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn slots(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn service(id: &str, name: &str, catalog: &[&str]) -> AppointmentService {
        AppointmentService {
            id: Some(id.to_string()),
            name: name.to_string(),
            price: None,
            slots: slots(catalog),
            extra: Map::new(),
        }
    }

    fn booking(service_id: &str, slot: &str) -> Booking {
        Booking {
            id: None,
            service_id: service_id.to_string(),
            service_name: String::new(),
            appointment_date: "2024-01-01".to_string(),
            slot: slot.to_string(),
            email: "p@example.com".to_string(),
            paid: false,
            transaction_id: None,
            details: Map::new(),
        }
    }

    #[test]
    fn test_remaining_slots_keeps_catalog_order() {
        let catalog = slots(&["9am", "10am", "11am"]);
        assert_eq!(remaining_slots(&catalog, ["10am"]), slots(&["9am", "11am"]));
    }

    #[test]
    fn test_remaining_slots_drops_repeats() {
        let catalog = slots(&["9am", "9am", "10am"]);
        assert_eq!(remaining_slots(&catalog, std::iter::empty()), slots(&["9am", "10am"]));
    }

    #[test]
    fn test_fully_booked_service_has_no_slots() {
        let services = vec![service("s1", "Cleaning", &["9am", "10am"])];
        let bookings = vec![booking("s1", "9am"), booking("s1", "10am")];

        let result = apply_availability(services, &bookings);
        assert!(result[0].slots.is_empty());
    }

    #[test]
    fn test_bookings_of_other_services_are_ignored() {
        let services = vec![
            service("s1", "Cleaning", &["9am", "10am"]),
            service("s2", "Whitening", &["9am"]),
        ];
        let bookings = vec![booking("s2", "9am")];

        let result = apply_availability(services, &bookings);
        assert_eq!(result[0].slots, slots(&["9am", "10am"]));
        assert!(result[1].slots.is_empty());
    }

    #[test]
    fn test_pipeline_shape() {
        let pipeline = availability_pipeline("2024-01-01");
        assert_eq!(pipeline.stages().len(), 3);
    }
}
