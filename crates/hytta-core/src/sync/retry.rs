//! Bounded exponential-backoff retry state machine.
//!
//! Wraps one logical operation ("poll the calendar feed"). Failures arm
//! a single retry deadline with doubling delays; exhaustion is observed
//! through state rather than thrown, since transient network conditions
//! are expected, not exceptional. No internal threads -- the owner
//! passes `now` in and checks `retry_due` on its tick.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::sync::types::SyncError;

/// Retry policy knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Automatic retries before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each failure.
    #[serde(default = "default_initial_backoff_secs")]
    pub initial_backoff_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_secs() -> u64 {
    5
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_secs: default_initial_backoff_secs(),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `failures` (1-based):
    /// `initial * 2^(failures - 1)`, so 5s, 10s, 20s with defaults.
    pub fn delay_for(&self, failures: u32) -> Duration {
        // Exponent capped to keep the shift in range for hostile configs.
        let exponent = failures.saturating_sub(1).min(16);
        let secs = self.initial_backoff_secs.saturating_mul(1 << exponent);
        Duration::seconds(secs as i64)
    }
}

/// Observable retry state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryState {
    /// Failed attempts since the last success or reset. Stops counting
    /// at the policy's `max_retries`.
    pub consecutive_failures: u32,
    /// Armed retry deadline, if a chain is in flight.
    pub pending_retry_at: Option<DateTime<Utc>>,
    /// Message from the most recent failure.
    pub last_error: Option<String>,
}

/// Backoff retry wrapper for a single logical operation.
///
/// States: Idle -> Retrying(n) -> Idle (on success or exhaustion).
/// Only one retry chain may be in flight at a time: invoking `attempt`
/// while a retry deadline is armed but not yet due is a no-op.
#[derive(Debug, Clone)]
pub struct BackoffRetry {
    policy: RetryPolicy,
    state: RetryState,
}

impl BackoffRetry {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn state(&self) -> &RetryState {
        &self.state
    }

    /// A retry chain is in flight.
    pub fn is_retrying(&self) -> bool {
        self.state.pending_retry_at.is_some()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.state.consecutive_failures
    }

    pub fn pending_retry_at(&self) -> Option<DateTime<Utc>> {
        self.state.pending_retry_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    /// Retries ran out and no further automatic attempt is armed.
    pub fn exhausted(&self) -> bool {
        self.state.consecutive_failures >= self.policy.max_retries
            && self.state.pending_retry_at.is_none()
    }

    /// Whether the armed retry deadline has come due.
    pub fn retry_due(&self, now: DateTime<Utc>) -> bool {
        self.state.pending_retry_at.map_or(false, |at| at <= now)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Run `operation` unless a retry is already pending.
    ///
    /// Returns `None` without invoking the operation while a retry chain
    /// is in flight and not yet due -- the guard against overlapping
    /// chains. A due deadline is consumed here; that call *is* the
    /// retry. On failure the next deadline is armed, or the machine
    /// halts once `consecutive_failures` reaches the policy maximum.
    pub fn attempt<T, F>(
        &mut self,
        now: DateTime<Utc>,
        operation: F,
    ) -> Option<Result<T, SyncError>>
    where
        F: FnOnce() -> Result<T, SyncError>,
    {
        if let Some(at) = self.state.pending_retry_at {
            if now < at {
                return None;
            }
            self.state.pending_retry_at = None;
        }

        match operation() {
            Ok(value) => {
                self.reset();
                Some(Ok(value))
            }
            Err(err) => {
                self.on_failure(now, &err);
                Some(Err(err))
            }
        }
    }

    /// Cancel any pending retry and zero the failure count. Idempotent;
    /// for out-of-band recovery such as a manual reconnect.
    pub fn reset(&mut self) {
        self.state = RetryState::default();
    }

    fn on_failure(&mut self, now: DateTime<Utc>, err: &SyncError) {
        self.state.last_error = Some(err.to_string());

        if self.state.consecutive_failures < self.policy.max_retries {
            self.state.consecutive_failures += 1;
            let delay = self.policy.delay_for(self.state.consecutive_failures);
            self.state.pending_retry_at = Some(now + delay);
            log::debug!(
                "poll failed ({} consecutive), retry in {}s",
                self.state.consecutive_failures,
                delay.num_seconds()
            );
        } else {
            // Exhausted: stop silently. Callers watch consecutive_failures.
            self.state.pending_retry_at = None;
            log::warn!(
                "poll failed, retries exhausted after {} attempts",
                self.state.consecutive_failures
            );
        }
    }
}
