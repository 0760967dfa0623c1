//! Booking conflict detection and overlap classification.
//!
//! Given a candidate reservation and the other members' bookings,
//! reports every overlapping booking together with the shape of the
//! overlap. Pure functions -- persistence and presentation live with
//! the callers, so this is safe for concurrent read-only use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::interval::DateInterval;
use crate::error::BookingError;

/// Shape of an overlap between a candidate period and an existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapKind {
    /// Candidate fully contains the existing booking.
    ContainsExisting,
    /// Existing booking fully contains the candidate.
    ContainedByExisting,
    /// Candidate starts inside the existing booking.
    OverlapsStart,
    /// Candidate extends past the existing booking's start.
    OverlapsEnd,
}

/// An existing booking to test a candidate against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub title: String,
    pub interval: DateInterval,
}

/// A single detected conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub booking_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: OverlapKind,
}

/// Classify how `candidate` overlaps `existing`.
///
/// Callers must already have established that the intervals overlap.
/// The containment checks run before the partial checks -- a full
/// containment would otherwise also satisfy one of the partial tests.
/// Identical intervals classify as `ContainsExisting` (the first case
/// fires since both bounds hold). `OverlapsEnd` is the catch-all for
/// every remaining overlap shape.
fn classify(candidate: &DateInterval, existing: &DateInterval) -> OverlapKind {
    if candidate.start <= existing.start && candidate.end >= existing.end {
        OverlapKind::ContainsExisting
    } else if existing.start <= candidate.start && existing.end >= candidate.end {
        OverlapKind::ContainedByExisting
    } else if candidate.start < existing.end && candidate.start >= existing.start {
        OverlapKind::OverlapsStart
    } else {
        OverlapKind::OverlapsEnd
    }
}

/// Find every booking that conflicts with `candidate`.
///
/// `exclude_id` removes one booking (typically the one being edited)
/// from consideration before testing. Results keep the relative order
/// of `others`; callers needing chronological order sort explicitly.
///
/// # Errors
/// Returns `BookingError::InvalidInterval` when the candidate has
/// `start > end`. An empty `others` yields an empty Vec, not an error.
pub fn find_conflicts(
    candidate: &DateInterval,
    others: &[Booking],
    exclude_id: Option<&str>,
) -> Result<Vec<ConflictRecord>, BookingError> {
    if candidate.start > candidate.end {
        return Err(BookingError::InvalidInterval {
            start: candidate.start,
            end: candidate.end,
        });
    }

    let mut conflicts = Vec::new();
    for booking in others {
        if exclude_id.map_or(false, |id| id == booking.id) {
            continue;
        }
        if !candidate.overlaps(&booking.interval) {
            continue;
        }
        conflicts.push(ConflictRecord {
            booking_id: booking.id.clone(),
            title: booking.title.clone(),
            start: booking.interval.start,
            end: booking.interval.end,
            kind: classify(candidate, &booking.interval),
        });
    }
    Ok(conflicts)
}
