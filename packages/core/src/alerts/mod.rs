//! Alert output boundary.
//!
//! The scheduler decides *whether* to raise an alert and with what payload.
//! Rendering (desktop toast, localization, templating) belongs to whatever
//! consumer sits behind [`AlertSink`].

pub mod log;

pub use log::LogAlertSink;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::types::TimeSlot;

/// Payload describing a found reservation slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAlert {
    /// The instant the matched reservation would begin.
    pub start_time: DateTime<Utc>,
    /// Default title. Consumers may re-template and localize both strings.
    pub title: String,
    pub body: String,
}

impl SlotAlert {
    pub fn for_slot(slot: &TimeSlot) -> Self {
        Self {
            start_time: slot.start_time,
            title: "Possible reservation found".to_string(),
            body: format!("A reservation window opens at {}.", slot.start_time),
        }
    }
}

/// Destination for the one alert a polling session may raise.
#[async_trait]
pub trait AlertSink {
    /// Deliver the alert. Delivery failures are the sink's own concern;
    /// the scheduler raises at most once and has no retry policy.
    async fn deliver(&self, alert: &SlotAlert);
}
