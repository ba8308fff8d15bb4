//! Availability polling scheduler.
//!
//! Drives the poll loop for one subscription: one check immediately at
//! `start`, then a cancellable periodic timer. On each tick the availability
//! checker runs; the first match raises exactly one alert and ends the
//! session. Provider errors are logged and the loop continues; a single
//! failed poll never takes down the scheduler.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::alerts::{AlertSink, SlotAlert};
use crate::availability::{
    check_availability,
    error::SchedulerError,
    provider::SlotProvider,
    types::{PollResult, Subscription},
};

/// Lifecycle of one scheduler instance. `Stopped` is terminal: a scheduler
/// whose session ended (match found or cancelled) is not restartable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Stopped,
}

const PHASE_IDLE: u8 = 0;
const PHASE_RUNNING: u8 = 1;
const PHASE_STOPPED: u8 = 2;

/// State shared between the scheduler handle and its polling task.
///
/// There is no true parallelism within one session (the fetch is the only
/// suspension point), so plain atomics are enough; no locks.
struct SessionState {
    phase: AtomicU8,
    already_notified: AtomicBool,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: AtomicU8::new(PHASE_IDLE),
            already_notified: AtomicBool::new(false),
        }
    }

    fn phase(&self) -> Phase {
        match self.phase.load(Ordering::SeqCst) {
            PHASE_IDLE => Phase::Idle,
            PHASE_RUNNING => Phase::Running,
            _ => Phase::Stopped,
        }
    }

    fn set_phase(&self, phase: Phase) {
        let value = match phase {
            Phase::Idle => PHASE_IDLE,
            Phase::Running => PHASE_RUNNING,
            Phase::Stopped => PHASE_STOPPED,
        };
        self.phase.store(value, Ordering::SeqCst);
    }
}

pub struct SlotScheduler {
    provider: Arc<dyn SlotProvider + Send + Sync>,
    sink: Arc<dyn AlertSink + Send + Sync>,
    state: Arc<SessionState>,
    cancel_tx: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl SlotScheduler {
    pub fn new(
        provider: Arc<dyn SlotProvider + Send + Sync>,
        sink: Arc<dyn AlertSink + Send + Sync>,
    ) -> Self {
        Self {
            provider,
            sink,
            state: Arc::new(SessionState::new()),
            cancel_tx: None,
            task: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Begin polling for `subscription`.
    ///
    /// Valid only from `Idle`. The subscription is validated here no matter
    /// what the caller already checked, and nothing is armed on failure.
    /// One check runs synchronously before the timer starts, so the caller
    /// is not left waiting a full interval for the first result. If that
    /// first check already matches, the session completes without ever
    /// arming the timer.
    pub async fn start(&mut self, subscription: Subscription) -> Result<(), SchedulerError> {
        subscription.validate()?;
        if self.state.phase() != Phase::Idle {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.state.set_phase(Phase::Running);

        tracing::info!(
            "Polling started for resource {} (interval: {}ms)",
            subscription.resource_id,
            subscription.poll_interval_millis
        );

        if poll_once(&self.provider, &self.sink, &subscription, &self.state).await {
            return Ok(());
        }

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let provider = Arc::clone(&self.provider);
        let sink = Arc::clone(&self.sink);
        let state = Arc::clone(&self.state);

        let task = tokio::spawn(async move {
            let mut ticker =
                time::interval(Duration::from_millis(subscription.poll_interval_millis));
            // A tick that lands while the previous poll is still in flight
            // is dropped, not queued.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The interval's first tick completes immediately; the immediate
            // check above already covered it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if poll_once(&provider, &sink, &subscription, &state).await {
                            break;
                        }
                    }
                    // Fires on cancel() and when the handle is dropped.
                    _ = cancel_rx.changed() => {
                        break;
                    }
                }
            }
        });

        self.cancel_tx = Some(cancel_tx);
        self.task = Some(task);
        Ok(())
    }

    /// Disarm the timer and end the session.
    ///
    /// Idempotent. Cancelling an `Idle` scheduler is a no-op and leaves it
    /// startable. Takes effect immediately for future ticks; a fetch already
    /// in flight is not aborted, but its result is discarded on arrival.
    pub fn cancel(&mut self) {
        if self.state.phase() == Phase::Running {
            self.state.set_phase(Phase::Stopped);
            tracing::info!("Polling cancelled");
        }
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(true);
        }
    }

    /// Wait for the polling task to finish (match found, cancellation
    /// observed, or never started).
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::error!("Polling task failed: {}", err);
            }
        }
    }
}

impl Drop for SlotScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Execute a single poll cycle. Extracted for testability.
///
/// Returns `true` when the session is over: an alert was raised, or a stale
/// match arrived after cancellation and was discarded.
async fn poll_once(
    provider: &Arc<dyn SlotProvider + Send + Sync>,
    sink: &Arc<dyn AlertSink + Send + Sync>,
    subscription: &Subscription,
    state: &Arc<SessionState>,
) -> bool {
    let result = match check_availability(provider.as_ref(), subscription).await {
        Ok(result) => result,
        Err(err) => {
            // Transient. The next tick gets a fresh try.
            tracing::warn!("Availability check failed, no match this tick: {}", err);
            return false;
        }
    };

    match result {
        PollResult::Matched(slot) => {
            if state.phase() == Phase::Stopped {
                // Cancelled while the fetch was in flight. The result is
                // stale and must not raise an alert.
                return true;
            }
            if !state.already_notified.swap(true, Ordering::SeqCst) {
                let alert = SlotAlert::for_slot(&slot);
                sink.deliver(&alert).await;
                tracing::info!("Slot available at {}, alert raised", slot.start_time);
            }
            state.set_phase(Phase::Stopped);
            true
        }
        PollResult::NotFound => {
            tracing::debug!(
                "No slot between {} and {} yet, still searching",
                subscription.date_from,
                subscription.date_to
            );
            false
        }
    }
}
