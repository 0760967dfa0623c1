//! Adaptive calendar synchronization layer.
//!
//! Polls a remote calendar feed on a cadence that adapts to context
//! (upcoming bookings, night mode, connectivity) and recovers transient
//! failures with bounded exponential backoff. The loop is tick-driven:
//! the owner calls `SyncEngine::tick` with a fresh `PollContext`, and
//! every deadline is recomputed after each executed or skipped poll.

pub mod calendar_client;
pub mod engine;
pub mod retry;
pub mod scheduler;
pub mod types;

#[cfg(test)]
mod calendar_client_tests;
#[cfg(test)]
mod retry_tests;

pub use calendar_client::CalendarFeedClient;
pub use engine::{PollSource, SyncEngine};
pub use retry::{BackoffRetry, RetryPolicy, RetryState};
pub use scheduler::{PollContext, PollScheduler, TickAction};
pub use types::{SyncError, SyncStatus, UpcomingEvent};
