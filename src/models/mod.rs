pub mod booking;

pub use booking::{parse_form_datetime, Booking, BookingCreate, BookingUpdateDate};
