//! Tests for the calendar feed client.

#[cfg(test)]
mod tests {
    use super::super::calendar_client::*;
    use crate::sync::engine::PollSource;
    use crate::sync::types::SyncError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn fetch_parses_feed_events() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/feed")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "events": [
                        {
                            "id": "ev-1",
                            "title": "Family weekend",
                            "start": "2026-03-14T15:00:00Z",
                            "end": "2026-03-15T11:00:00Z"
                        }
                    ]
                }"#,
            )
            .create();

        let client = CalendarFeedClient::new(format!("{}/feed", server.url())).unwrap();
        let events = client.fetch(Utc::now()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "ev-1");
        assert_eq!(events[0].title, "Family weekend");
        assert_eq!(
            events[0].start,
            Utc.with_ymd_and_hms(2026, 3, 14, 15, 0, 0).unwrap()
        );
        mock.assert();
    }

    #[test]
    fn fetch_skips_malformed_entries() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/feed")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{
                    "events": [
                        { "id": "bad", "title": "No dates" },
                        {
                            "id": "good",
                            "title": "Ski trip",
                            "start": "2026-03-20T09:00:00Z",
                            "end": "2026-03-22T17:00:00Z"
                        }
                    ]
                }"#,
            )
            .create();

        let client = CalendarFeedClient::new(format!("{}/feed", server.url())).unwrap();
        let events = client.fetch(Utc::now()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "good");
    }

    #[test]
    fn server_error_maps_to_network_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/feed")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create();

        let mut client = CalendarFeedClient::new(format!("{}/feed", server.url())).unwrap();
        let err = client.poll().unwrap_err();
        assert!(matches!(err, SyncError::Network(_)));
    }

    #[test]
    fn missing_events_array_is_a_feed_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/feed")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{ "unexpected": true }"#)
            .create();

        let client = CalendarFeedClient::new(format!("{}/feed", server.url())).unwrap();
        let err = client.fetch(Utc::now()).unwrap_err();
        assert!(matches!(err, SyncError::Feed(_)));
    }
}
