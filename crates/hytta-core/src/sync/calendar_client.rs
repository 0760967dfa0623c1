//! HTTP client for the remote calendar feed.
//!
//! Fetches upcoming events as JSON from a configured feed URL. The
//! async reqwest call is driven to completion on an owned
//! current-thread runtime so the tick-driven engine stays synchronous.

use chrono::{DateTime, Utc};

use crate::sync::engine::PollSource;
use crate::sync::types::{SyncError, UpcomingEvent};

/// Poll source backed by an HTTP JSON feed.
///
/// Expected body shape:
/// `{ "events": [ { "id", "title", "start", "end" }, ... ] }`
/// with RFC 3339 timestamps.
pub struct CalendarFeedClient {
    feed_url: String,
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl CalendarFeedClient {
    pub fn new(feed_url: impl Into<String>) -> Result<Self, SyncError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            feed_url: feed_url.into(),
            http: reqwest::Client::new(),
            runtime,
        })
    }

    /// Fetch events starting at or after `from`.
    pub fn fetch(&self, from: DateTime<Utc>) -> Result<Vec<UpcomingEvent>, SyncError> {
        let mut url = url::Url::parse(&self.feed_url)
            .map_err(|e| SyncError::Feed(format!("invalid feed url: {e}")))?;
        url.query_pairs_mut().append_pair("from", &from.to_rfc3339());

        let body: serde_json::Value = self.runtime.block_on(async {
            self.http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        })?;

        let items = body["events"]
            .as_array()
            .ok_or_else(|| SyncError::Feed("missing 'events' array".to_string()))?;

        let mut events = Vec::with_capacity(items.len());
        for item in items {
            match parse_feed_event(item) {
                Some(event) => events.push(event),
                None => log::warn!("skipping malformed feed entry: {item}"),
            }
        }
        Ok(events)
    }
}

impl PollSource for CalendarFeedClient {
    fn poll(&mut self) -> Result<Vec<UpcomingEvent>, SyncError> {
        let now = Utc::now();
        self.fetch(now)
    }
}

/// Parse one feed entry; `None` when required fields are missing.
fn parse_feed_event(item: &serde_json::Value) -> Option<UpcomingEvent> {
    let id = item["id"].as_str()?.to_string();
    let title = item["title"].as_str()?.to_string();
    let start = parse_rfc3339(item["start"].as_str()?)?;
    let end = parse_rfc3339(item["end"].as_str()?)?;
    Some(UpcomingEvent {
        id,
        title,
        start,
        end,
    })
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
