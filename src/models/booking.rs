use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::FieldError;

/// Date-time pattern accepted from HTML form fields. Anything else is
/// treated as unparsable.
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub client_name: String,
    pub service_type: String,
    pub description: Option<String>,
    pub price: i64,
    pub appointment_time: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreate {
    pub client_name: String,
    pub service_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: i64,
    pub appointment_time: NaiveDateTime,
}

impl BookingCreate {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = vec![];

        if self.client_name.chars().count() < 2 {
            errors.push(FieldError {
                field: "client_name",
                message: "must be at least 2 characters".to_string(),
            });
        }
        if self.service_type.is_empty() {
            errors.push(FieldError {
                field: "service_type",
                message: "must not be empty".to_string(),
            });
        }
        if self.price < 0 {
            errors.push(FieldError {
                field: "price",
                message: "must not be negative".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingUpdateDate {
    pub appointment_time: NaiveDateTime,
}

pub fn parse_form_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, FORM_DATETIME_FORMAT).ok()
}
