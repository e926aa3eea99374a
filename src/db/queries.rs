use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingCreate};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn create_booking(conn: &Connection, new: &BookingCreate) -> rusqlite::Result<Booking> {
    let created_at = Utc::now().naive_utc();

    conn.execute(
        "INSERT INTO bookings (client_name, service_type, description, price, appointment_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.client_name,
            new.service_type,
            new.description,
            new.price,
            new.appointment_time.format(DATETIME_FORMAT).to_string(),
            created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;

    Ok(Booking {
        id: conn.last_insert_rowid(),
        client_name: new.client_name.clone(),
        service_type: new.service_type.clone(),
        description: new.description.clone(),
        price: new.price,
        appointment_time: new.appointment_time,
        created_at,
    })
}

pub fn list_bookings(conn: &Connection) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_name, service_type, description, price, appointment_time, created_at
         FROM bookings ORDER BY appointment_time ASC",
    )?;

    let rows = stmt.query_map([], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, client_name, service_type, description, price, appointment_time, created_at
         FROM bookings WHERE id = ?1",
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Updates `appointment_time` only. Returns false when no row has that id.
pub fn reschedule_booking(
    conn: &Connection,
    id: i64,
    new_time: &NaiveDateTime,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET appointment_time = ?1 WHERE id = ?2",
        params![new_time.format(DATETIME_FORMAT).to_string(), id],
    )?;
    Ok(count > 0)
}

/// Returns false when no row had that id; deleting twice is harmless.
pub fn delete_booking(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let appointment_time_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    let appointment_time = NaiveDateTime::parse_from_str(&appointment_time_str, DATETIME_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id: row.get(0)?,
        client_name: row.get(1)?,
        service_type: row.get(2)?,
        description: row.get(3)?,
        price: row.get(4)?,
        appointment_time,
        created_at,
    })
}
