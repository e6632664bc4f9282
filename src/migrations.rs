//! Versioned schema for the SQLite record store.
//!
//! Migration history is tracked through SQLite's `user_version` pragma by
//! `rusqlite_migration`, so reopening an already-initialized database is a
//! no-op. Bulk ingestion happens outside this crate; the schema here only
//! has to exist before the first query runs.

use log::info;
use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::{Result, TripQueryError};

/// Full migration history for the trips schema.
pub fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "CREATE TABLE trips (
            id INTEGER PRIMARY KEY,
            vendor_id TEXT NOT NULL,
            pickup_time TEXT NOT NULL,
            dropoff_time TEXT NOT NULL
        );
        CREATE INDEX idx_trips_vendor_id ON trips(vendor_id);",
    )])
}

/// Bring a connection up to the latest schema version.
pub fn apply(conn: &mut Connection) -> Result<()> {
    info!("[migrations] applying trips schema");
    migrations()
        .to_latest(conn)
        .map_err(|e| TripQueryError::Store {
            message: format!("schema migration failed: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_validate() {
        migrations().validate().expect("migration SQL should parse");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply(&mut conn).expect("first apply");
        apply(&mut conn).expect("second apply");

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM trips", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
