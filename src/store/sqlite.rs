//! SQLite-backed record store.
//!
//! One connection, parameterized statements only. All aggregation runs
//! inside SQLite (`COUNT`, `AVG` over `julianday`, `strftime` hour
//! extraction) so cost stays on the store side regardless of dataset size.
//! Store failures are classified into the crate's taxonomy here; callers
//! never see raw SQLite error codes or query text.

use chrono::NaiveDateTime;
use log::{debug, info};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use super::RecordStore;
use crate::error::{Result, TripQueryError};
use crate::migrations;
use crate::types::{HourCount, Trip, VendorCount, TIMESTAMP_FORMAT};

/// The four-field projection every row-returning query uses.
const TRIP_COLUMNS: &str = "id, vendor_id, pickup_time, dropoff_time";

/// Real record store over a SQLite database.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open (or create) a store at the given path and bring its schema up
    /// to date.
    pub fn open(path: &str) -> Result<Self> {
        info!("[open] opening trip store at {}", path);
        let mut conn = Connection::open(path).map_err(classify)?;
        Self::configure(&conn)?;
        migrations::apply(&mut conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (for testing).
    pub fn in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(classify)?;
        Self::configure(&conn)?;
        migrations::apply(&mut conn)?;
        Ok(Self { conn })
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.busy_timeout(std::time::Duration::from_millis(5000))
            .map_err(classify)?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(classify)?;
        // journal_mode reports the resulting mode as a row
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(classify)?;
        Ok(())
    }

    /// Bulk-load trips, all inside one transaction.
    ///
    /// Ingestion belongs to an external pipeline in production; this hook
    /// exists for that pipeline and for test fixtures. Ids are taken from
    /// the given trips verbatim.
    pub fn insert_trips(&mut self, trips: &[Trip]) -> Result<usize> {
        let tx = self.conn.transaction().map_err(classify)?;
        let mut inserted = 0;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO trips (id, vendor_id, pickup_time, dropoff_time)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(classify)?;
            for trip in trips {
                inserted += stmt
                    .execute(params![
                        trip.id,
                        trip.vendor_id,
                        trip.pickup_time.format(TIMESTAMP_FORMAT).to_string(),
                        trip.dropoff_time.format(TIMESTAMP_FORMAT).to_string(),
                    ])
                    .map_err(classify)?;
            }
        }
        tx.commit().map_err(classify)?;
        debug!("[insert_trips] loaded {} trips", inserted);
        Ok(inserted)
    }

    fn trip_from_row(row: &Row<'_>) -> rusqlite::Result<Trip> {
        Ok(Trip {
            id: row.get(0)?,
            vendor_id: row.get(1)?,
            pickup_time: timestamp_from_row(row, 2)?,
            dropoff_time: timestamp_from_row(row, 3)?,
        })
    }
}

impl RecordStore for SqliteRecordStore {
    fn count_trips(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM trips", [], |row| row.get(0))
            .map_err(classify)
    }

    fn sample_ids(&self, limit: u32) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM trips ORDER BY id LIMIT ?1")
            .map_err(classify)?;
        let ids = stmt
            .query_map(params![limit], |row| row.get(0))
            .map_err(classify)?
            .collect::<rusqlite::Result<Vec<i64>>>()
            .map_err(classify)?;
        Ok(ids)
    }

    fn trip_by_id(&self, id: i64) -> Result<Option<Trip>> {
        self.conn
            .query_row(
                &format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1"),
                params![id],
                Self::trip_from_row,
            )
            .optional()
            .map_err(classify)
    }

    fn trips_from_offset(&self, offset: u64, limit: u32) -> Result<Vec<Trip>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {TRIP_COLUMNS} FROM trips ORDER BY id LIMIT ?1 OFFSET ?2"
            ))
            .map_err(classify)?;
        let trips = stmt
            .query_map(params![limit, offset as i64], Self::trip_from_row)
            .map_err(classify)?
            .collect::<rusqlite::Result<Vec<Trip>>>()
            .map_err(classify)?;
        Ok(trips)
    }

    fn trips_after(&self, cursor: i64, limit: u32) -> Result<Vec<Trip>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {TRIP_COLUMNS} FROM trips WHERE id > ?1 ORDER BY id LIMIT ?2"
            ))
            .map_err(classify)?;
        let trips = stmt
            .query_map(params![cursor, limit], Self::trip_from_row)
            .map_err(classify)?
            .collect::<rusqlite::Result<Vec<Trip>>>()
            .map_err(classify)?;
        Ok(trips)
    }

    fn avg_duration_minutes(&self) -> Result<Option<f64>> {
        // julianday yields fractional days; 1440 minutes per day.
        self.conn
            .query_row(
                "SELECT AVG((julianday(dropoff_time) - julianday(pickup_time)) * 1440.0)
                 FROM trips
                 WHERE julianday(dropoff_time) > julianday(pickup_time)",
                [],
                |row| row.get::<_, Option<f64>>(0),
            )
            .map_err(classify)
    }

    fn peak_pickup_hour(&self) -> Result<Option<HourCount>> {
        self.conn
            .query_row(
                "SELECT CAST(strftime('%H', pickup_time) AS INTEGER) AS hour,
                        COUNT(*) AS trip_count
                 FROM trips
                 GROUP BY hour
                 ORDER BY trip_count DESC, hour ASC
                 LIMIT 1",
                [],
                |row| {
                    Ok(HourCount {
                        hour: row.get(0)?,
                        trip_count: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(classify)
    }

    fn vendor_distribution(&self, limit: u32) -> Result<Vec<VendorCount>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT vendor_id, COUNT(*) AS trip_count
                 FROM trips
                 GROUP BY vendor_id
                 ORDER BY trip_count DESC, vendor_id ASC
                 LIMIT ?1",
            )
            .map_err(classify)?;
        let counts = stmt
            .query_map(params![limit], |row| {
                Ok(VendorCount {
                    vendor_id: row.get(0)?,
                    trip_count: row.get(1)?,
                })
            })
            .map_err(classify)?
            .collect::<rusqlite::Result<Vec<VendorCount>>>()
            .map_err(classify)?;
        Ok(counts)
    }

    fn set_vendor(&self, trip_id: i64, vendor_id: &str) -> Result<usize> {
        // Single conditional statement; SQLite commits it before returning,
        // so a nonzero row count means the change is durable.
        self.conn
            .execute(
                "UPDATE trips SET vendor_id = ?1 WHERE id = ?2",
                params![vendor_id, trip_id],
            )
            .map_err(classify)
    }
}

fn timestamp_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Map a SQLite failure onto the crate taxonomy. Busy and locked states are
/// transient; everything else is an opaque store error whose message never
/// includes the statement that failed.
fn classify(err: rusqlite::Error) -> TripQueryError {
    match &err {
        rusqlite::Error::SqliteFailure(ffi_err, message) => {
            let detail = message.clone().unwrap_or_else(|| ffi_err.to_string());
            match ffi_err.code {
                ErrorCode::DatabaseBusy => TripQueryError::Timeout { message: detail },
                ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::PermissionDenied
                | ErrorCode::NotADatabase => TripQueryError::Unavailable { message: detail },
                _ => TripQueryError::Store { message: detail },
            }
        }
        _ => TripQueryError::Store {
            message: err.to_string(),
        },
    }
}
