//! SQLite-based storage for cabin bookings.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::data_dir;
use crate::booking::{Booking, DateInterval};
use crate::error::StorageError;

/// A stored booking row.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub id: String,
    pub title: String,
    /// Family member who made the booking.
    pub member: String,
    pub interval: DateInterval,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// View as the classifier's input type.
    pub fn to_booking(&self) -> Booking {
        Booking {
            id: self.id.clone(),
            title: self.title.clone(),
            interval: self.interval,
        }
    }
}

/// Booking persistence.
pub struct BookingDb {
    conn: Connection,
}

impl BookingDb {
    /// Open the database at the default location.
    pub fn open_default() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        Self::open(dir.join("bookings.db"))
    }

    /// Open the database at a specific path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn =
            Connection::open(path.as_ref()).map_err(|source| StorageError::OpenFailed {
                path: PathBuf::from(path.as_ref()),
                source,
            })?;
        Self::init(conn)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                member TEXT NOT NULL,
                start_at TEXT NOT NULL,
                end_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Insert a booking, returning the stored record.
    pub fn insert(
        &self,
        title: &str,
        member: &str,
        interval: DateInterval,
    ) -> Result<BookingRecord, StorageError> {
        let record = BookingRecord {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            member: member.to_string(),
            interval,
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO bookings (id, title, member, start_at, end_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.title,
                record.member,
                record.interval.start.to_rfc3339(),
                record.interval.end.to_rfc3339(),
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(record)
    }

    /// All bookings ordered by start date.
    pub fn list(&self) -> Result<Vec<BookingRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, member, start_at, end_at, created_at
             FROM bookings ORDER BY start_at",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, title, member, start_at, end_at, created_at) = row?;
            records.push(BookingRecord {
                id,
                title,
                member,
                interval: DateInterval {
                    start: parse_timestamp(&start_at)?,
                    end: parse_timestamp(&end_at)?,
                },
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(records)
    }

    /// Fetch one booking by id.
    pub fn get(&self, id: &str) -> Result<BookingRecord, StorageError> {
        self.list()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Remove a booking by id.
    pub fn remove(&self, id: &str) -> Result<(), StorageError> {
        let affected = self
            .conn
            .execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::QueryFailed(format!("bad timestamp '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn interval(from: u32, to: u32) -> DateInterval {
        DateInterval::new(
            Utc.with_ymd_and_hms(2026, 7, from, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 7, to, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn insert_and_list() {
        let db = BookingDb::open_in_memory().unwrap();
        db.insert("Midsummer", "Astrid", interval(10, 14)).unwrap();
        db.insert("July week", "Jonas", interval(1, 8)).unwrap();

        let records = db.list().unwrap();
        assert_eq!(records.len(), 2);
        // Ordered by start date.
        assert_eq!(records[0].title, "July week");
        assert_eq!(records[1].member, "Astrid");
    }

    #[test]
    fn remove_deletes_booking() {
        let db = BookingDb::open_in_memory().unwrap();
        let record = db.insert("Weekend", "Astrid", interval(3, 5)).unwrap();

        db.remove(&record.id).unwrap();
        assert!(db.list().unwrap().is_empty());
        assert!(matches!(
            db.remove(&record.id),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bookings.db");

        {
            let db = BookingDb::open(&path).unwrap();
            db.insert("Easter", "Jonas", interval(2, 6)).unwrap();
        }

        let db = BookingDb::open(&path).unwrap();
        let records = db.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Easter");
        assert_eq!(records[0].interval, interval(2, 6));
    }

    #[test]
    fn records_convert_to_classifier_input() {
        let db = BookingDb::open_in_memory().unwrap();
        let record = db.insert("Autumn", "Astrid", interval(20, 25)).unwrap();

        let booking = record.to_booking();
        assert_eq!(booking.id, record.id);
        assert_eq!(booking.interval, record.interval);
    }
}
