//! HTTP client for the remote gaps endpoint.
//!
//! The wire format is an irregular three-level nesting: an array of months,
//! each an array of days, each an array of `{dt, startTime}` objects. Array
//! lengths, sort order and non-emptiness are all unspecified, and a slot's
//! own timestamps are not guaranteed consistent with its position in the
//! nesting. Conversion is therefore per-slot and lenient: a slot that fails
//! to parse is skipped with a warning instead of failing the whole payload.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::availability::{
    error::CheckError,
    provider::SlotProvider,
    types::{SlotDay, SlotMonth, SlotPayload, TimeSlot},
};

#[derive(Clone)]
pub struct GapsClient {
    base_url: String,
    http: Client,
}

impl GapsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_raw(&self, resource_id: i64) -> Result<RawPayload, CheckError> {
        let url = format!("{}/api/gaps/{}", self.base_url, resource_id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| CheckError::fetch(err.to_string()))?;

        if !response.status().is_success() {
            return Err(CheckError::fetch(format!(
                "gaps endpoint returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<RawPayload>()
            .await
            .map_err(|err| CheckError::parse(err.to_string()))
    }
}

/// Months -> days -> slots, exactly as the endpoint sends them.
type RawPayload = Vec<Vec<Vec<RawSlot>>>;

#[derive(Debug, Deserialize)]
struct RawSlot {
    dt: String,
    #[serde(rename = "startTime")]
    start_time: String,
}

fn convert_slot(raw: &RawSlot) -> Result<TimeSlot, CheckError> {
    Ok(TimeSlot {
        date: parse_timestamp(&raw.dt)?,
        start_time: parse_timestamp(&raw.start_time)?,
    })
}

/// Accepts RFC 3339, naive date-times, and bare dates (midnight UTC).
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CheckError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(CheckError::parse(format!("invalid timestamp '{value}'")))
}

fn convert_payload(raw: RawPayload) -> SlotPayload {
    let months = raw
        .into_iter()
        .map(|raw_month| SlotMonth {
            days: raw_month
                .into_iter()
                .map(|raw_day| SlotDay {
                    slots: raw_day
                        .iter()
                        .filter_map(|raw_slot| match convert_slot(raw_slot) {
                            Ok(slot) => Some(slot),
                            Err(err) => {
                                tracing::warn!("Skipping malformed slot entry: {}", err);
                                None
                            }
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    SlotPayload { months }
}

#[async_trait]
impl SlotProvider for GapsClient {
    async fn fetch_slots(&self, resource_id: i64) -> Result<SlotPayload, CheckError> {
        let raw = self.fetch_raw(resource_id).await?;
        Ok(convert_payload(raw))
    }

    fn provider_name(&self) -> &str {
        "gaps"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_body(body: serde_json::Value, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/gaps/67"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn fetches_and_converts_the_nested_payload() {
        let body = json!([
            [],
            [
                [],
                [
                    { "dt": "2024-03-05", "startTime": "2024-03-05T09:30:00Z" },
                    { "dt": "2024-03-05", "startTime": "2024-03-05T10:00:00" }
                ]
            ]
        ]);
        let server = server_with_body(body, 200).await;
        let client = GapsClient::new(server.uri());

        let payload = client.fetch_slots(67).await.unwrap();

        assert_eq!(payload.months.len(), 2);
        assert!(payload.months[0].days.is_empty());
        assert!(payload.months[1].days[0].slots.is_empty());
        let slots = &payload.months[1].days[1].slots;
        assert_eq!(slots.len(), 2);
        assert_eq!(
            slots[0].start_time,
            Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap()
        );
        assert_eq!(
            slots[1].start_time,
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let server = server_with_body(json!([]), 503).await;
        let client = GapsClient::new(server.uri());

        let err = client.fetch_slots(67).await.unwrap_err();
        assert!(matches!(err, CheckError::Fetch { .. }));
    }

    #[tokio::test]
    async fn misshapen_body_is_a_parse_error() {
        let server = server_with_body(json!({ "unexpected": "shape" }), 200).await;
        let client = GapsClient::new(server.uri());

        let err = client.fetch_slots(67).await.unwrap_err();
        assert!(matches!(err, CheckError::Parse { .. }));
    }

    #[tokio::test]
    async fn malformed_slots_are_skipped_not_fatal() {
        let body = json!([
            [
                [
                    { "dt": "not a timestamp", "startTime": "also junk" },
                    { "dt": "2024-03-05", "startTime": "2024-03-05T09:30:00Z" }
                ]
            ]
        ]);
        let server = server_with_body(body, 200).await;
        let client = GapsClient::new(server.uri());

        let payload = client.fetch_slots(67).await.unwrap();
        assert_eq!(payload.months[0].days[0].slots.len(), 1);
    }

    #[test]
    fn timestamp_parsing_accepts_the_known_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-05T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05T09:30:00+00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05T09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05 09:30:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-03-05").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("tomorrow-ish").is_err());
    }
}
