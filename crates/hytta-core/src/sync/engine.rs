//! Tick-driven sync engine.
//!
//! Composes the adaptive scheduler with the backoff retry machine
//! around an injected poll source. The owner calls `tick()` with a
//! fresh context; the engine decides whether anything is due, runs at
//! most one poll attempt, and recomputes its deadlines. The injected
//! poll is the loop's only suspension point.

use chrono::{DateTime, Utc};
use std::sync::mpsc::Sender;

use crate::clock::Clock;
use crate::events::Event;
use crate::sync::retry::{BackoffRetry, RetryPolicy};
use crate::sync::scheduler::{PollContext, PollScheduler, TickAction};
use crate::sync::types::{SyncError, SyncStatus, UpcomingEvent};

/// Source of upcoming events from the remote calendar.
pub trait PollSource {
    fn poll(&mut self) -> Result<Vec<UpcomingEvent>, SyncError>;
}

impl<F> PollSource for F
where
    F: FnMut() -> Result<Vec<UpcomingEvent>, SyncError>,
{
    fn poll(&mut self) -> Result<Vec<UpcomingEvent>, SyncError> {
        self()
    }
}

/// Adaptive sync loop over an injected clock and poll source.
///
/// Owns its scheduler deadline and retry state exclusively; all changes
/// go through `tick`, `reset_retry` and `shutdown`.
pub struct SyncEngine<C: Clock, P: PollSource> {
    clock: C,
    source: P,
    scheduler: PollScheduler,
    retry: BackoffRetry,
    last_sync_at: Option<DateTime<Utc>>,
    latest_events: Vec<UpcomingEvent>,
    events_tx: Option<Sender<Event>>,
}

impl<C: Clock, P: PollSource> SyncEngine<C, P> {
    pub fn new(clock: C, source: P, policy: RetryPolicy) -> Self {
        Self {
            clock,
            source,
            scheduler: PollScheduler::new(),
            retry: BackoffRetry::new(policy),
            last_sync_at: None,
            latest_events: Vec::new(),
            events_tx: None,
        }
    }

    /// Publish lifecycle events to `tx`.
    pub fn with_event_channel(mut self, tx: Sender<Event>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Drive the loop once.
    ///
    /// Runs a poll attempt when the periodic deadline is due (floor
    /// permitting), when connectivity just came back (out-of-band,
    /// bypassing the floor), or when a backoff retry has come due.
    /// Afterwards the next deadline is recomputed from the context.
    pub fn tick(&mut self, context: &PollContext) -> SyncStatus {
        let now = self.clock.now();
        let retry_due = self.retry.retry_due(now);

        let should_poll = match self.scheduler.tick(context, now) {
            TickAction::PollReconnect => {
                self.emit(Event::ConnectivityRegained { at: now });
                // A reconnect is out-of-band recovery: clear any stale
                // retry chain and let the immediate poll decide.
                self.retry.reset();
                true
            }
            TickAction::Poll => true,
            // Backoff retries fire independently of the periodic cadence.
            TickAction::Wait => retry_due && context.connected,
        };

        if should_poll {
            self.attempt_poll(now);
            self.scheduler.reschedule(context, self.clock.now());
        }

        self.status()
    }

    fn attempt_poll(&mut self, now: DateTime<Utc>) {
        let source = &mut self.source;
        // None: a retry chain is in flight, the periodic attempt was a no-op.
        let Some(result) = self.retry.attempt(now, || source.poll()) else {
            return;
        };

        self.emit(Event::PollStarted { at: now });
        match result {
            Ok(events) => {
                self.last_sync_at = Some(now);
                self.emit(Event::PollSucceeded {
                    events_fetched: events.len(),
                    at: now,
                });
                self.latest_events = events;
            }
            Err(err) => {
                let failures = self.retry.consecutive_failures();
                self.emit(Event::PollFailed {
                    consecutive_failures: failures,
                    error: err.to_string(),
                    at: now,
                });
                match self.retry.pending_retry_at() {
                    Some(at) => self.emit(Event::RetryScheduled {
                        attempt: failures,
                        delay_secs: (at - now).num_seconds().max(0) as u64,
                        at: now,
                    }),
                    None => self.emit(Event::RetriesExhausted {
                        consecutive_failures: failures,
                        at: now,
                    }),
                }
            }
        }
    }

    fn emit(&self, event: Event) {
        log::debug!("sync event: {event:?}");
        if let Some(tx) = &self.events_tx {
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(event);
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            last_sync_at: self.last_sync_at,
            consecutive_failures: self.retry.consecutive_failures(),
            retrying: self.retry.is_retrying(),
            needs_attention: self.retry.exhausted(),
        }
    }

    /// Events fetched by the most recent successful poll.
    pub fn latest_events(&self) -> &[UpcomingEvent] {
        &self.latest_events
    }

    /// Earliest instant at which `tick` could have work to do.
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        match (self.scheduler.next_poll_at(), self.retry.pending_retry_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Manual recovery entry point: clears retry state unconditionally.
    pub fn reset_retry(&mut self) {
        self.retry.reset();
    }

    /// Cancel every armed deadline. Nothing fires after this.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
        self.retry.reset();
    }
}
