use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::models::Booking;

/// Fixed civil offset the salon operates in. "Today" on the dashboard is
/// computed against this offset no matter where the server runs.
pub const SALON_UTC_OFFSET_HOURS: i32 = 3;

/// Appointment length in minutes per service.
pub const SERVICE_DURATIONS: &[(&str, i64)] = &[
    ("Haircut", 45),
    ("Coloring", 120),
    ("Manicure", 60),
    ("Pedicure", 75),
    ("Styling", 30),
    ("Makeup", 90),
];

pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Shown when no past bookings exist to rank.
pub const NO_POPULAR_SERVICE: &str = "—";

const CHART_DAYS: i64 = 7;

pub fn service_duration(service_type: &str) -> i64 {
    SERVICE_DURATIONS
        .iter()
        .find(|(name, _)| *name == service_type)
        .map(|(_, minutes)| *minutes)
        .unwrap_or(DEFAULT_DURATION_MINUTES)
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub today_count: usize,
    pub today_revenue: i64,
    pub history_revenue: i64,
    pub history_clients: usize,
    pub popular_service: String,
    pub chart: Vec<ChartPoint>,
}

/// Current wall-clock time in the salon's civil offset, marker dropped.
pub fn salon_now() -> NaiveDateTime {
    let offset = FixedOffset::east_opt(SALON_UTC_OFFSET_HOURS * 3600).expect("offset in range");
    Utc::now().with_timezone(&offset).naive_local()
}

pub fn build_stats(bookings: &[Booking]) -> DashboardStats {
    build_stats_at(salon_now(), bookings)
}

pub fn build_stats_at(now: NaiveDateTime, bookings: &[Booking]) -> DashboardStats {
    let today = now.date();

    let mut today_count = 0;
    let mut today_revenue = 0;
    for booking in bookings {
        if booking.appointment_time.date() == today {
            today_count += 1;
            today_revenue += booking.price;
        }
    }

    let past: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.appointment_time < now)
        .collect();
    let history_revenue = past.iter().map(|b| b.price).sum();
    let history_clients = past.len();
    let popular_service = popular_service(&past);

    DashboardStats {
        today_count,
        today_revenue,
        history_revenue,
        history_clients,
        popular_service,
        chart: chart_series(today, bookings),
    }
}

/// Most frequent service among past bookings. Ties go to whichever service
/// was seen first during the scan.
fn popular_service(past: &[&Booking]) -> String {
    let mut counts: Vec<(&str, usize)> = vec![];
    for booking in past {
        match counts
            .iter()
            .position(|(name, _)| *name == booking.service_type)
        {
            Some(i) => counts[i].1 += 1,
            None => counts.push((&booking.service_type, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for &(name, n) in &counts {
        if best.map_or(true, |(_, best_n)| n > best_n) {
            best = Some((name, n));
        }
    }

    best.map(|(name, _)| name.to_string())
        .unwrap_or_else(|| NO_POPULAR_SERVICE.to_string())
}

/// Revenue per calendar day for the window ending today, oldest first.
fn chart_series(today: NaiveDate, bookings: &[Booking]) -> Vec<ChartPoint> {
    let mut chart = Vec::with_capacity(CHART_DAYS as usize);
    for offset in (0..CHART_DAYS).rev() {
        let date = today - Duration::days(offset);
        let revenue = bookings
            .iter()
            .filter(|b| b.appointment_time.date() == date)
            .map(|b| b.price)
            .sum();
        chart.push(ChartPoint {
            label: format!("{}.{}", date.day(), date.month()),
            revenue,
        });
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn booking(id: i64, service: &str, price: i64, time: &str) -> Booking {
        Booking {
            id,
            client_name: format!("Client {id}"),
            service_type: service.to_string(),
            description: None,
            price,
            appointment_time: dt(time),
            created_at: dt("2026-01-01 00:00"),
        }
    }

    #[test]
    fn test_today_and_history_split() {
        // A and C are today but still ahead of now; only B is in the past.
        let now = dt("2026-03-10 12:00");
        let bookings = vec![
            booking(1, "Haircut", 100, "2026-03-10 15:00"),
            booking(2, "Manicure", 50, "2026-03-09 11:00"),
            booking(3, "Coloring", 200, "2026-03-10 13:00"),
        ];

        let stats = build_stats_at(now, &bookings);
        assert_eq!(stats.today_count, 2);
        assert_eq!(stats.today_revenue, 300);
        assert_eq!(stats.history_clients, 1);
        assert_eq!(stats.history_revenue, 50);
        assert_eq!(stats.popular_service, "Manicure");
    }

    #[test]
    fn test_midnight_booking_belongs_to_that_day() {
        let now = dt("2026-03-10 12:00");
        let bookings = vec![booking(1, "Haircut", 80, "2026-03-10 00:00")];

        let stats = build_stats_at(now, &bookings);
        assert_eq!(stats.today_count, 1);
        assert_eq!(stats.today_revenue, 80);
    }

    #[test]
    fn test_popular_on_empty_past_is_placeholder() {
        let now = dt("2026-03-10 12:00");
        let stats = build_stats_at(now, &[]);
        assert_eq!(stats.popular_service, NO_POPULAR_SERVICE);

        // Future-only bookings leave history empty too.
        let bookings = vec![booking(1, "Haircut", 100, "2026-03-11 10:00")];
        let stats = build_stats_at(now, &bookings);
        assert_eq!(stats.popular_service, NO_POPULAR_SERVICE);
        assert_eq!(stats.history_clients, 0);
    }

    #[test]
    fn test_popular_counts_frequency() {
        let now = dt("2026-03-10 12:00");
        let bookings = vec![
            booking(1, "Haircut", 0, "2026-03-01 10:00"),
            booking(2, "Haircut", 0, "2026-03-02 10:00"),
            booking(3, "Manicure", 0, "2026-03-03 10:00"),
        ];
        let stats = build_stats_at(now, &bookings);
        assert_eq!(stats.popular_service, "Haircut");
    }

    #[test]
    fn test_popular_tie_goes_to_first_seen() {
        let now = dt("2026-03-10 12:00");
        let bookings = vec![
            booking(1, "Manicure", 0, "2026-03-01 10:00"),
            booking(2, "Haircut", 0, "2026-03-02 10:00"),
            booking(3, "Haircut", 0, "2026-03-03 10:00"),
            booking(4, "Manicure", 0, "2026-03-04 10:00"),
        ];
        let stats = build_stats_at(now, &bookings);
        assert_eq!(stats.popular_service, "Manicure");
    }

    #[test]
    fn test_chart_window_and_labels() {
        let now = dt("2026-03-10 12:00");
        let bookings = vec![
            booking(1, "Haircut", 100, "2026-03-10 15:00"), // today
            booking(2, "Manicure", 50, "2026-03-04 11:00"), // oldest in-window day
            booking(3, "Coloring", 200, "2026-03-03 11:00"), // outside the window
        ];

        let stats = build_stats_at(now, &bookings);
        assert_eq!(stats.chart.len(), 7);
        assert_eq!(stats.chart[0].label, "4.3");
        assert_eq!(stats.chart[0].revenue, 50);
        assert_eq!(stats.chart[6].label, "10.3");
        assert_eq!(stats.chart[6].revenue, 100);

        // Out-of-window booking is excluded from the series...
        let series_total: i64 = stats.chart.iter().map(|p| p.revenue).sum();
        assert_eq!(series_total, 150);
        // ...but still counted in history.
        assert_eq!(stats.history_revenue, 250);
        assert_eq!(stats.history_clients, 2);
    }

    #[test]
    fn test_chart_empty_days_are_zero() {
        let now = dt("2026-03-10 12:00");
        let stats = build_stats_at(now, &[]);
        assert_eq!(stats.chart.len(), 7);
        assert!(stats.chart.iter().all(|p| p.revenue == 0));
    }

    #[test]
    fn test_service_duration_lookup() {
        assert_eq!(service_duration("Haircut"), 45);
        assert_eq!(service_duration("Coloring"), 120);
        assert_eq!(service_duration("Hot Stone Massage"), DEFAULT_DURATION_MINUTES);
        assert_eq!(service_duration(""), DEFAULT_DURATION_MINUTES);
    }
}
