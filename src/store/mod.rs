//! Record store boundary.
//!
//! The engine never talks to a concrete database client; it is handed
//! something implementing [`RecordStore`] — a narrow capability that can run
//! the handful of parameterized reads and the one write the operations need.
//! Two implementations ship with the crate:
//!
//! - [`SqliteRecordStore`] — the real store, parameterized SQL over one
//!   SQLite connection
//! - [`MemoryRecordStore`] — an in-memory double with identical semantics
//!   and per-operation call counters, for tests

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

use crate::error::Result;
use crate::types::{HourCount, Trip, VendorCount};

/// Read and limited-write access to the trip dataset.
///
/// Every method is one self-contained store round trip; implementations
/// must be safe to call from concurrently running operations and must not
/// retain state between calls. Row-returning reads order by `id` ascending.
/// Aggregates run inside the store so the dataset is never loaded into
/// memory.
pub trait RecordStore {
    /// Total number of trips.
    fn count_trips(&self) -> Result<i64>;

    /// First `limit` trip ids, ascending.
    fn sample_ids(&self, limit: u32) -> Result<Vec<i64>>;

    /// Look up a single trip; `None` when the id does not exist.
    fn trip_by_id(&self, id: i64) -> Result<Option<Trip>>;

    /// `limit` trips starting at `offset` in id order.
    fn trips_from_offset(&self, offset: u64, limit: u32) -> Result<Vec<Trip>>;

    /// `limit` trips with `id > cursor`, in id order.
    fn trips_after(&self, cursor: i64, limit: u32) -> Result<Vec<Trip>>;

    /// Mean duration in minutes over trips where dropoff > pickup, or
    /// `None` when no trip qualifies. Unrounded.
    fn avg_duration_minutes(&self) -> Result<Option<f64>>;

    /// Pickup hour with the most trips, lowest hour winning ties, or
    /// `None` on an empty dataset.
    fn peak_pickup_hour(&self) -> Result<Option<HourCount>>;

    /// Per-vendor trip counts, descending, at most `limit` entries;
    /// vendor id ascending breaks ties.
    fn vendor_distribution(&self, limit: u32) -> Result<Vec<VendorCount>>;

    /// Set `vendor_id` on one trip and commit durably before returning.
    /// Returns the affected-row count: 0 means the id does not exist.
    fn set_vendor(&self, trip_id: i64, vendor_id: &str) -> Result<usize>;
}
