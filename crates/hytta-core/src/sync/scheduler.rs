//! Adaptive poll interval selection.
//!
//! Chooses how long to wait before the next poll from the current
//! context. The cadence tightens to 5 minutes when a booking start is
//! near, relaxes to 60 minutes overnight, and stops entirely while
//! offline. A 60-second floor between attempt starts protects the
//! remote API from rapid context flapping; only the reconnect trigger
//! bypasses it.
//!
//! At most one deadline is armed per instance; every reschedule
//! replaces it, and `shutdown()` clears it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How far ahead an event start counts as "near" (minutes).
pub const NEAR_EVENT_WINDOW_MINS: i64 = 120;
/// Poll cadence when an event is near (minutes).
pub const NEAR_EVENT_POLL_MINS: i64 = 5;
/// Poll cadence overnight (minutes).
pub const NIGHT_POLL_MINS: i64 = 60;
/// Default poll cadence (minutes).
pub const DEFAULT_POLL_MINS: i64 = 30;
/// Minimum spacing between attempt starts (seconds).
pub const MIN_POLL_SPACING_SECS: i64 = 60;

/// Inputs to one scheduling decision. Supplied fresh on every tick;
/// the scheduler keeps no hidden context beyond what is passed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollContext {
    /// Start instants of known upcoming events, any order.
    pub upcoming_event_starts: Vec<DateTime<Utc>>,
    /// Overnight mode relaxes the cadence.
    pub night_mode: bool,
    /// No polling at all while disconnected.
    pub connected: bool,
}

/// Decision produced by [`PollScheduler::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Run a poll attempt now.
    Poll,
    /// Out-of-band poll triggered by connectivity coming back. The only
    /// case that bypasses the spacing floor.
    PollReconnect,
    /// Nothing due.
    Wait,
}

/// Self-rescheduling poll deadline, driven by `tick`.
#[derive(Debug, Clone)]
pub struct PollScheduler {
    next_poll_at: Option<DateTime<Utc>>,
    last_attempt_at: Option<DateTime<Utc>>,
    was_connected: bool,
}

impl PollScheduler {
    /// Create an idle scheduler. The first connected tick polls
    /// immediately (treated as a connectivity transition).
    pub fn new() -> Self {
        Self {
            next_poll_at: None,
            last_attempt_at: None,
            was_connected: false,
        }
    }

    /// Delay before the next poll for this context; `None` while offline.
    /// First matching rule wins: offline, night, near event, default.
    pub fn next_delay(context: &PollContext, now: DateTime<Utc>) -> Option<Duration> {
        if !context.connected {
            return None;
        }
        if context.night_mode {
            return Some(Duration::minutes(NIGHT_POLL_MINS));
        }
        let window_end = now + Duration::minutes(NEAR_EVENT_WINDOW_MINS);
        let event_near = context
            .upcoming_event_starts
            .iter()
            .any(|start| *start >= now && *start <= window_end);
        if event_near {
            Some(Duration::minutes(NEAR_EVENT_POLL_MINS))
        } else {
            Some(Duration::minutes(DEFAULT_POLL_MINS))
        }
    }

    /// Recompute and arm the next deadline from a fresh context,
    /// replacing any armed one.
    pub fn reschedule(&mut self, context: &PollContext, now: DateTime<Utc>) {
        self.next_poll_at = Self::next_delay(context, now).map(|delay| now + delay);
    }

    /// Decide whether a poll attempt should run now.
    ///
    /// Handles the offline -> online transition (one immediate
    /// out-of-band poll, replacing any armed deadline) and defers
    /// deadlines that would violate the spacing floor.
    pub fn tick(&mut self, context: &PollContext, now: DateTime<Utc>) -> TickAction {
        let reconnected = context.connected && !self.was_connected;
        self.was_connected = context.connected;

        if !context.connected {
            // Disarm while offline.
            self.next_poll_at = None;
            return TickAction::Wait;
        }

        if reconnected {
            self.mark_attempt(now);
            return TickAction::PollReconnect;
        }

        match self.next_poll_at {
            Some(at) if at <= now => {}
            Some(_) => return TickAction::Wait,
            None => {
                // Nothing armed yet: arm from the table and wait.
                self.reschedule(context, now);
                return TickAction::Wait;
            }
        }

        // Spacing floor: defer attempts starting too soon after the
        // previous attempt's start.
        if let Some(last) = self.last_attempt_at {
            let earliest = last + Duration::seconds(MIN_POLL_SPACING_SECS);
            if now < earliest {
                self.next_poll_at = Some(earliest);
                return TickAction::Wait;
            }
        }

        self.mark_attempt(now);
        TickAction::Poll
    }

    fn mark_attempt(&mut self, now: DateTime<Utc>) {
        self.last_attempt_at = Some(now);
        self.next_poll_at = None;
    }

    /// Currently armed deadline, if any.
    pub fn next_poll_at(&self) -> Option<DateTime<Utc>> {
        self.next_poll_at
    }

    /// Start of the previous attempt.
    pub fn last_attempt_at(&self) -> Option<DateTime<Utc>> {
        self.last_attempt_at
    }

    /// Disarm everything. Nothing is due after this.
    pub fn shutdown(&mut self) {
        self.next_poll_at = None;
    }
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new()
    }
}
