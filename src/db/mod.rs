pub mod queries;

use std::time::Duration;

use anyhow::Context;
use rusqlite::Connection;

/// Bounded startup retry against the datastore. If the schema still cannot
/// be created after the last attempt, the failure is logged and the server
/// starts anyway; requests then fail with generic server errors.
pub const CONNECT_ATTEMPTS: u32 = 5;
pub const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_name TEXT NOT NULL,
    service_type TEXT NOT NULL,
    description TEXT,
    price INTEGER NOT NULL DEFAULT 0,
    appointment_time TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_bookings_appointment_time ON bookings(appointment_time);
";

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = open(path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

pub async fn init_db_with_retry(
    path: &str,
    attempts: u32,
    delay: Duration,
) -> anyhow::Result<Connection> {
    let conn = open(path)?;

    let mut remaining = attempts;
    while remaining > 0 {
        match ensure_schema(&conn) {
            Ok(()) => {
                tracing::info!("database schema ready");
                break;
            }
            Err(e) => {
                remaining -= 1;
                if remaining == 0 {
                    tracing::error!(
                        error = %e,
                        "could not prepare database schema after {attempts} attempts, serving anyway"
                    );
                } else {
                    tracing::warn!(
                        error = %e,
                        retries_left = remaining,
                        "database not ready, retrying in {}s",
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Ok(conn)
}

fn open(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    Ok(conn)
}

/// Idempotent: safe to call on a database that already has the table.
pub fn ensure_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(SCHEMA)
        .context("failed to create bookings schema")?;
    Ok(())
}
