use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{parse_form_datetime, Booking, BookingCreate};
use crate::services::stats::{self, DashboardStats};
use crate::state::AppState;

static INDEX_HTML: &str = include_str!("../web/index.html");

// GET /
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_bookings(&db)?
    };
    let stats = stats::build_stats(&bookings);

    Ok(Html(render_dashboard(&bookings, &stats)))
}

#[derive(Deserialize)]
pub struct AddBookingForm {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub appointment_time: String,
}

// POST /add
//
// An empty or malformed date aborts the submission and the client lands
// back on the dashboard unchanged. Same for a payload that fails
// validation; the form path never surfaces errors.
pub async fn add_booking(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddBookingForm>,
) -> Result<Redirect, AppError> {
    let Some(appointment_time) = parse_form_datetime(&form.appointment_time) else {
        return Ok(Redirect::to("/"));
    };

    let payload = BookingCreate {
        client_name: form.client_name,
        service_type: form.service_type,
        description: Some(form.description).filter(|d| !d.is_empty()),
        price: form.price.parse().unwrap_or(0),
        appointment_time,
    };
    if payload.validate().is_err() {
        return Ok(Redirect::to("/"));
    }

    {
        let db = state.db.lock().unwrap();
        queries::create_booking(&db, &payload)?;
    }
    Ok(Redirect::to("/"))
}

// GET|POST /delete/:id. A missing id is a no-op on this path.
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    {
        let db = state.db.lock().unwrap();
        queries::delete_booking(&db, id)?;
    }
    Ok(Redirect::to("/"))
}

#[derive(Deserialize)]
pub struct RescheduleForm {
    #[serde(default)]
    pub new_time: String,
}

// POST /reschedule/:id. Malformed dates and unknown ids are ignored.
pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<RescheduleForm>,
) -> Result<Redirect, AppError> {
    let Some(new_time) = parse_form_datetime(&form.new_time) else {
        return Ok(Redirect::to("/"));
    };

    {
        let db = state.db.lock().unwrap();
        queries::reschedule_booking(&db, id, &new_time)?;
    }
    Ok(Redirect::to("/"))
}

fn render_dashboard(bookings: &[Booking], stats: &DashboardStats) -> String {
    let rows = if bookings.is_empty() {
        r#"<tr><td colspan="7" class="empty">No bookings yet</td></tr>"#.to_string()
    } else {
        bookings.iter().map(booking_row).collect()
    };
    let chart_data = serde_json::to_string(&stats.chart).unwrap_or_else(|_| "[]".to_string());

    INDEX_HTML
        .replace("{{TODAY_COUNT}}", &stats.today_count.to_string())
        .replace("{{TODAY_REVENUE}}", &stats.today_revenue.to_string())
        .replace("{{HISTORY_REVENUE}}", &stats.history_revenue.to_string())
        .replace("{{HISTORY_CLIENTS}}", &stats.history_clients.to_string())
        .replace("{{POPULAR_SERVICE}}", &escape_html(&stats.popular_service))
        .replace("{{CHART_DATA}}", &chart_data)
        .replace("{{ROWS}}", &rows)
}

fn booking_row(b: &Booking) -> String {
    format!(
        concat!(
            "<tr>",
            "<td>{time}</td>",
            "<td>{name}</td>",
            "<td>{service}</td>",
            "<td>{duration} min</td>",
            "<td>{price}</td>",
            "<td>{description}</td>",
            "<td class=\"actions\">",
            "<form method=\"post\" action=\"/reschedule/{id}\">",
            "<input name=\"new_time\" placeholder=\"YYYY-MM-DD HH:MM\" />",
            "<button type=\"submit\">Move</button>",
            "</form>",
            "<form method=\"post\" action=\"/delete/{id}\">",
            "<button type=\"submit\" class=\"danger\">Delete</button>",
            "</form>",
            "</td>",
            "</tr>"
        ),
        time = b.appointment_time.format("%Y-%m-%d %H:%M"),
        name = escape_html(&b.client_name),
        service = escape_html(&b.service_type),
        duration = stats::service_duration(&b.service_type),
        price = b.price,
        description = escape_html(b.description.as_deref().unwrap_or("")),
        id = b.id,
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
