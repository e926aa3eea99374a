use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingCreate, BookingUpdateDate};
use crate::state::AppState;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
pub struct BookingResponse {
    id: i64,
    client_name: String,
    service_type: String,
    description: Option<String>,
    price: i64,
    appointment_time: String,
    created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            client_name: b.client_name,
            service_type: b.service_type,
            description: b.description,
            price: b.price,
            appointment_time: b.appointment_time.format(DATETIME_FORMAT).to_string(),
            created_at: b.created_at.format(DATETIME_FORMAT).to_string(),
        }
    }
}

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BookingCreate>,
) -> Result<Json<BookingResponse>, AppError> {
    payload.validate().map_err(AppError::Validation)?;

    let booking = {
        let db = state.db.lock().unwrap();
        queries::create_booking(&db, &payload)?
    };

    tracing::info!(id = booking.id, client = %booking.client_name, "booking created");
    Ok(Json(booking.into()))
}

// GET /bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_bookings(&db)?
    };

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

// DELETE /bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_booking(&db, id)?
    };

    if !deleted {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    tracing::info!(id, "booking deleted");
    Ok(Json(serde_json::json!({ "ok": true })))
}

// PUT /bookings/:id/reschedule
pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingUpdateDate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = {
        let db = state.db.lock().unwrap();
        queries::reschedule_booking(&db, id, &payload.appointment_time)?
    };

    if !updated {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    tracing::info!(id, "booking rescheduled");
    Ok(Json(serde_json::json!({ "status": "updated" })))
}
