//! Booking intervals and conflict detection.

pub mod conflict;
pub mod interval;

pub use conflict::{find_conflicts, Booking, ConflictRecord, OverlapKind};
pub use interval::DateInterval;
