//! Core types for calendar synchronization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event fetched from the remote calendar feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    /// Feed-assigned identifier.
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Snapshot of sync health for callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Last successful poll.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Failed attempts since the last success or reset.
    pub consecutive_failures: u32,
    /// Whether a backoff retry is pending.
    pub retrying: bool,
    /// Retries are exhausted; manual recovery is required.
    pub needs_attention: bool,
}

/// Sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Calendar feed error: {0}")]
    Feed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
