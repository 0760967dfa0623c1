//! Sync lifecycle events.
//!
//! Every observable transition in the sync engine produces an Event.
//! The engine publishes them over an mpsc channel supplied by its owner;
//! the CLI prints them, a GUI could subscribe the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A poll attempt started.
    PollStarted {
        at: DateTime<Utc>,
    },
    /// A poll attempt succeeded.
    PollSucceeded {
        events_fetched: usize,
        at: DateTime<Utc>,
    },
    /// A poll attempt failed.
    PollFailed {
        consecutive_failures: u32,
        error: String,
        at: DateTime<Utc>,
    },
    /// A backoff retry was armed after a failure.
    RetryScheduled {
        attempt: u32,
        delay_secs: u64,
        at: DateTime<Utc>,
    },
    /// Automatic retries ran out; manual recovery is required.
    RetriesExhausted {
        consecutive_failures: u32,
        at: DateTime<Utc>,
    },
    /// Connectivity came back; an out-of-band poll was triggered.
    ConnectivityRegained {
        at: DateTime<Utc>,
    },
}
