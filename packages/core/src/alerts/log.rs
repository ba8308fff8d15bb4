//! Log-backed alert delivery, used by the binary. Stands in for the
//! excluded rendering layer: anything subscribed to the log stream picks
//! the alert up from here.

use async_trait::async_trait;

use super::{AlertSink, SlotAlert};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl LogAlertSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn deliver(&self, alert: &SlotAlert) {
        tracing::info!(
            "ALERT: {} (slot starts {}) {}",
            alert.title,
            alert.start_time,
            alert.body
        );
    }
}
