//! Collection names shared by every cell.

pub const INFOS: &str = "infos";
pub const APPOINTMENT_SERVICES: &str = "appointmentServices";
pub const BOOKINGS: &str = "bookings";
pub const USERS: &str = "users";
pub const DOCTORS: &str = "doctors";
pub const PAYMENTS: &str = "payments";

/// At most one booking per patient, service and date.
pub const BOOKING_UNIQUE_KEY: &[&str] = &["serviceId", "appointmentDate", "email"];
pub const USER_UNIQUE_KEY: &[&str] = &["email"];
