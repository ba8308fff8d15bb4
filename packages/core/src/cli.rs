use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::Parser;

/// Slot notifier CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "slot-notifier",
    version,
    about = "Polls the appointment endpoint and alerts once when a slot opens in your date range"
)]
pub struct Cli {
    /// Resource (county/location) id to watch
    #[arg(long)]
    pub resource_id: i64,

    /// Inclusive start of the date range (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_parser = parse_from_bound)]
    pub date_from: DateTime<Utc>,

    /// Inclusive end of the date range (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_parser = parse_to_bound)]
    pub date_to: DateTime<Utc>,

    /// Polling interval in milliseconds (overrides POLL_INTERVAL_MILLIS)
    #[arg(long)]
    pub poll_interval: Option<u64>,
}

fn parse_from_bound(value: &str) -> Result<DateTime<Utc>, String> {
    parse_bound(value, false)
}

fn parse_to_bound(value: &str) -> Result<DateTime<Utc>, String> {
    parse_bound(value, true)
}

/// A bare date expands to the start of that day for the lower bound and the
/// end of it for the upper bound, so `--date-to 2024-03-10` includes slots
/// on March 10th.
fn parse_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = if end_of_day {
            NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
        } else {
            NaiveTime::MIN
        };
        return Ok(date.and_time(time).and_utc());
    }
    Err(format!(
        "invalid date '{value}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"
    ))
}
