//! Scripted `SlotProvider` for tests.
//!
//! Responses can be queued per call; once the script runs out the fallback
//! response repeats. An optional artificial delay makes in-flight fetches
//! observable under `tokio`'s paused test clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::availability::{error::CheckError, provider::SlotProvider, types::SlotPayload};

pub struct MockGapsClient {
    script: Mutex<VecDeque<Result<SlotPayload, CheckError>>>,
    fallback: Result<SlotPayload, CheckError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockGapsClient {
    /// A provider that always answers with an empty payload.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(SlotPayload::default()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Replace the fallback response with `payload`.
    pub fn with_payload(mut self, payload: SlotPayload) -> Self {
        self.fallback = Ok(payload);
        self
    }

    /// Replace the fallback response with `error`.
    pub fn with_error(mut self, error: CheckError) -> Self {
        self.fallback = Err(error);
        self
    }

    /// Queue responses consumed one per call before the fallback kicks in.
    pub fn with_script(self, responses: Vec<Result<SlotPayload, CheckError>>) -> Self {
        *self.script.lock().expect("script lock") = responses.into();
        self
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockGapsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlotProvider for MockGapsClient {
    async fn fetch_slots(&self, _resource_id: i64) -> Result<SlotPayload, CheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.script.lock().expect("script lock").pop_front();
        scripted.unwrap_or_else(|| self.fallback.clone())
    }

    fn provider_name(&self) -> &str {
        "mock-gaps"
    }
}
