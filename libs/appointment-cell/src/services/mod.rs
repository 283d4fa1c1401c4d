pub mod availability;
pub mod booking;
pub mod catalog;

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use catalog::CatalogService;
