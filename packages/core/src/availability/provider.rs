//! Slot Provider Interface
//!
//! Provides abstraction layer for slot data sources, so the checker and
//! scheduler never depend on the live HTTP client directly.

use async_trait::async_trait;

use crate::availability::{error::CheckError, types::SlotPayload};

/// Trait for slot data providers to ensure data source independence
#[async_trait]
pub trait SlotProvider {
    /// Fetch the current slot payload for the given resource.
    async fn fetch_slots(&self, resource_id: i64) -> Result<SlotPayload, CheckError>;

    /// Get the name of this provider for logging/debugging
    fn provider_name(&self) -> &str;
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, CheckError>;
