//! Availability checker: fetch the slot payload and search it for the first
//! slot whose start time lies within the subscription's date range.
//!
//! "First" means first in the payload's own traversal order (months, then
//! days, then slots), not the chronologically earliest. The remote source's
//! matching behavior is order-sensitive and is reproduced exactly here.

use chrono::{DateTime, Utc};

use crate::availability::{
    error::CheckError,
    provider::SlotProvider,
    types::{PollResult, SlotPayload, Subscription, TimeSlot},
};

/// Run one availability check for the given subscription.
///
/// Issues a single fetch through the provider and searches the payload.
/// Fetch and parse failures are returned to the caller; the scheduler maps
/// both to "no match this tick" but logs them.
pub async fn check_availability(
    provider: &(dyn SlotProvider + Send + Sync),
    subscription: &Subscription,
) -> Result<PollResult, CheckError> {
    let payload = provider.fetch_slots(subscription.resource_id).await?;

    Ok(
        match first_slot_in_range(&payload, subscription.date_from, subscription.date_to) {
            Some(slot) => PollResult::Matched(slot.clone()),
            None => PollResult::NotFound,
        },
    )
}

/// First slot with `date_from <= start_time <= date_to`, in payload order.
///
/// The traversal terminates on the first hit; empty months and days simply
/// contribute no candidates.
pub fn first_slot_in_range(
    payload: &SlotPayload,
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
) -> Option<&TimeSlot> {
    payload
        .iter_slots()
        .find(|slot| date_from <= slot.start_time && slot.start_time <= date_to)
}
