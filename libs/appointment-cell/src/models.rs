use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use shared_models::store::InsertOneResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

/// A bookable service and its static slot catalog, shared by every date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentService {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    #[serde(default)]
    pub slots: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Output row of the pipeline availability variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAvailability {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub service_id: String,
    pub service_name: String,
    pub appointment_date: String,
    #[serde(alias = "serviceSlot")]
    pub slot: String,
    pub email: String,
    #[serde(default)]
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Patient name, phone, price and whatever else the client attaches.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRejection {
    pub acknowledged: bool,
    pub message: String,
}

impl BookingRejection {
    pub fn already_booked(service_name: &str) -> Self {
        Self {
            acknowledged: false,
            message: format!("You already have a booking on {}", service_name),
        }
    }
}

/// A duplicate booking is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingOutcome {
    Created(InsertOneResult),
    Rejected(BookingRejection),
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}
