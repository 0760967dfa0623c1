//! Reservation period with closed-interval semantics.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// A reservation period. Both endpoints are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateInterval {
    /// Create an interval, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, BookingError> {
        if start > end {
            return Err(BookingError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Closed-interval overlap: the two periods share at least one instant.
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &DateInterval) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn new_rejects_reversed_endpoints() {
        let err = DateInterval::new(day(5), day(2)).unwrap_err();
        assert!(matches!(err, BookingError::InvalidInterval { .. }));
    }

    #[test]
    fn new_accepts_zero_length() {
        let iv = DateInterval::new(day(3), day(3)).unwrap();
        assert_eq!(iv.duration(), Duration::zero());
    }

    #[test]
    fn touching_endpoints_overlap() {
        // Closed intervals: sharing a single instant counts.
        let a = DateInterval::new(day(1), day(5)).unwrap();
        let b = DateInterval::new(day(5), day(9)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        let a = DateInterval::new(day(1), day(4)).unwrap();
        let b = DateInterval::new(day(5), day(9)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contains_is_inclusive() {
        let outer = DateInterval::new(day(1), day(10)).unwrap();
        let inner = DateInterval::new(day(1), day(10)).unwrap();
        assert!(outer.contains(&inner));
    }
}
