//! Core data types for availability polling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::error::SubscriptionError;

/// Lower bound for the polling interval, to avoid hammering the endpoint.
pub const MIN_POLL_INTERVAL_MILLIS: u64 = 1_000;

/// What the user asked to be watched. Immutable for the lifetime of one
/// polling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Identifies the queried resource (county/location id).
    pub resource_id: i64,
    /// Inclusive lower bound of the acceptable slot start time.
    pub date_from: DateTime<Utc>,
    /// Inclusive upper bound of the acceptable slot start time.
    pub date_to: DateTime<Utc>,
    pub poll_interval_millis: u64,
}

impl Subscription {
    /// Check the invariants the scheduler relies on.
    ///
    /// Runs at the scheduler boundary regardless of any validation the
    /// caller (CLI, GUI, ...) already performed.
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if self.resource_id <= 0 {
            return Err(SubscriptionError::InvalidResourceId(self.resource_id));
        }
        if self.date_from > self.date_to {
            return Err(SubscriptionError::InvertedDateRange {
                from: self.date_from,
                to: self.date_to,
            });
        }
        if self.poll_interval_millis < MIN_POLL_INTERVAL_MILLIS {
            return Err(SubscriptionError::IntervalTooShort(
                self.poll_interval_millis,
            ));
        }
        Ok(())
    }
}

/// A single bookable slot as reported by the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Calendar day the source filed this slot under. Not guaranteed to be
    /// consistent with the parent day in the payload nesting.
    pub date: DateTime<Utc>,
    /// The instant the reservation would begin.
    pub start_time: DateTime<Utc>,
}

/// One day's worth of slots. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDay {
    pub slots: Vec<TimeSlot>,
}

/// One month's worth of days. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMonth {
    pub days: Vec<SlotDay>,
}

/// The full remote payload: months, in the order the source sent them.
///
/// The source guarantees neither sort order nor uniqueness, and empty
/// sub-sequences at any level are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPayload {
    pub months: Vec<SlotMonth>,
}

impl SlotPayload {
    /// All slots in the payload's own order: months, then days within a
    /// month, then slots within a day. This is the tie-break order the
    /// checker's "first match wins" rule is defined over.
    pub fn iter_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.months
            .iter()
            .flat_map(|month| month.days.iter())
            .flat_map(|day| day.slots.iter())
    }
}

/// Outcome of one availability check. Produced per tick, consumed
/// immediately, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    Matched(TimeSlot),
    NotFound,
}
