//! Tests for the backoff retry state machine.

#[cfg(test)]
mod tests {
    use super::super::retry::*;
    use crate::sync::types::{SyncError, UpcomingEvent};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn fail() -> Result<Vec<UpcomingEvent>, SyncError> {
        Err(SyncError::Feed("boom".to_string()))
    }

    fn ok() -> Result<Vec<UpcomingEvent>, SyncError> {
        Ok(Vec::new())
    }

    #[test]
    fn backoff_delays_double_then_halt() {
        let mut retry = BackoffRetry::new(RetryPolicy::default());
        let mut now = t0();

        // Failure 1: retry armed 5s out.
        retry.attempt(now, fail).unwrap().unwrap_err();
        assert_eq!(retry.consecutive_failures(), 1);
        assert_eq!(retry.pending_retry_at(), Some(now + Duration::seconds(5)));

        // Failure 2 (the due retry): 10s.
        now += Duration::seconds(5);
        retry.attempt(now, fail).unwrap().unwrap_err();
        assert_eq!(retry.consecutive_failures(), 2);
        assert_eq!(retry.pending_retry_at(), Some(now + Duration::seconds(10)));

        // Failure 3: 20s.
        now += Duration::seconds(10);
        retry.attempt(now, fail).unwrap().unwrap_err();
        assert_eq!(retry.consecutive_failures(), 3);
        assert_eq!(retry.pending_retry_at(), Some(now + Duration::seconds(20)));
        assert!(!retry.exhausted());

        // Failure 4: no further delay is scheduled; the machine halts at
        // the policy maximum.
        now += Duration::seconds(20);
        retry.attempt(now, fail).unwrap().unwrap_err();
        assert_eq!(retry.consecutive_failures(), 3);
        assert_eq!(retry.pending_retry_at(), None);
        assert!(retry.exhausted());
    }

    #[test]
    fn attempt_while_retrying_is_a_no_op() {
        let mut retry = BackoffRetry::new(RetryPolicy::default());
        let now = t0();

        retry.attempt(now, fail);
        assert!(retry.is_retrying());

        // Before the deadline the operation must not run again.
        let mut calls = 0;
        let outcome = retry.attempt(now + Duration::seconds(2), || {
            calls += 1;
            ok()
        });
        assert!(outcome.is_none());
        assert_eq!(calls, 0);
        assert_eq!(retry.consecutive_failures(), 1);
    }

    #[test]
    fn due_retry_consumes_the_deadline() {
        let mut retry = BackoffRetry::new(RetryPolicy::default());
        let now = t0();

        retry.attempt(now, fail);
        assert!(retry.retry_due(now + Duration::seconds(5)));

        let mut calls = 0;
        let outcome = retry.attempt(now + Duration::seconds(5), || {
            calls += 1;
            ok()
        });
        assert!(matches!(outcome, Some(Ok(_))));
        assert_eq!(calls, 1);
        assert!(!retry.is_retrying());
    }

    #[test]
    fn success_resets_state() {
        let mut retry = BackoffRetry::new(RetryPolicy::default());
        let now = t0();

        retry.attempt(now, fail);
        retry.attempt(now + Duration::seconds(5), ok);

        assert_eq!(retry.consecutive_failures(), 0);
        assert_eq!(retry.pending_retry_at(), None);
        assert!(retry.last_error().is_none());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut retry = BackoffRetry::new(RetryPolicy::default());
        retry.attempt(t0(), fail);
        assert!(retry.is_retrying());

        retry.reset();
        retry.reset();
        assert_eq!(retry.consecutive_failures(), 0);
        assert_eq!(retry.pending_retry_at(), None);
        assert!(!retry.is_retrying());
    }

    #[test]
    fn custom_policy_scales_delays() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff_secs: 2,
        };
        assert_eq!(policy.delay_for(1), Duration::seconds(2));
        assert_eq!(policy.delay_for(2), Duration::seconds(4));
        assert_eq!(policy.delay_for(5), Duration::seconds(32));
    }

    #[test]
    fn exhaustion_surfaces_last_error() {
        let mut retry = BackoffRetry::new(RetryPolicy {
            max_retries: 1,
            initial_backoff_secs: 5,
        });
        let now = t0();

        retry.attempt(now, fail);
        retry.attempt(now + Duration::seconds(5), fail);

        assert!(retry.exhausted());
        assert_eq!(retry.last_error(), Some("Calendar feed error: boom"));
    }
}
