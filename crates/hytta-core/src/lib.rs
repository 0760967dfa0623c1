//! # Hytta Core Library
//!
//! Core business logic for Hytta, a shared-cabin booking manager.
//! It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary; any GUI would be a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Booking**: pure interval-conflict classification for reservations
//! - **Sync**: tick-driven adaptive polling of a remote calendar feed,
//!   with bounded exponential-backoff recovery of transient failures
//! - **Storage**: SQLite booking store and TOML-based configuration
//! - **Clock**: injected time source so every deadline is testable
//!   without sleeping
//!
//! ## Key Components
//!
//! - [`find_conflicts`]: booking conflict classifier
//! - [`SyncEngine`]: composed adaptive poll loop
//! - [`BookingDb`]: booking persistence
//! - [`Config`]: application configuration management

pub mod booking;
pub mod clock;
pub mod error;
pub mod events;
pub mod storage;
pub mod sync;

pub use booking::{find_conflicts, Booking, ConflictRecord, DateInterval, OverlapKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{BookingError, ConfigError, CoreError, StorageError};
pub use events::Event;
pub use storage::{BookingDb, BookingRecord, Config};
pub use sync::{
    BackoffRetry, CalendarFeedClient, PollContext, PollScheduler, RetryPolicy, SyncEngine,
    SyncError, SyncStatus, UpcomingEvent,
};
