//! Error types for availability polling

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::availability::types::MIN_POLL_INTERVAL_MILLIS;

/// Errors from a single availability check.
///
/// Both variants are transient: the scheduler logs them and keeps polling.
/// They stay distinguishable so the caller can report them differently.
#[derive(Error, Debug, Clone)]
pub enum CheckError {
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl CheckError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch { message: message.into() }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }
}

/// Why a `Subscription` failed validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("resource id must be a positive integer, got {0}")]
    InvalidResourceId(i64),

    #[error("date_from {from} is after date_to {to}")]
    InvertedDateRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("poll interval {0}ms is below the {MIN_POLL_INTERVAL_MILLIS}ms minimum")]
    IntervalTooShort(u64),
}

/// Errors surfaced synchronously from `SlotScheduler::start`.
///
/// These are the only failures a session ever propagates to its caller;
/// everything that happens after `start` succeeds is absorbed at the tick
/// boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("invalid subscription: {0}")]
    InvalidSubscription(#[from] SubscriptionError),

    #[error("scheduler has already been started")]
    AlreadyRunning,
}
