//! Trip query engine.
//!
//! [`TripEngine`] wraps an injected [`RecordStore`] and exposes the
//! operation surface a transport layer calls into. It holds no state of
//! its own beyond the store handle; every operation is a self-contained
//! unit of work, so concurrent requests never contend on anything inside
//! this crate. Pagination lives in [`crate::pagination`] and the report
//! assembly in [`crate::analytics`]; the small lookups and the one
//! mutation live here.

use log::{debug, info};

use crate::error::{Result, TripQueryError};
use crate::store::RecordStore;
use crate::types::{Trip, VendorUpdateReceipt};

/// Number of ids `get_sample` returns unless the caller asks otherwise.
pub const DEFAULT_SAMPLE_SIZE: u32 = 5;

/// Confirmation text carried on a successful vendor update.
const VENDOR_UPDATED_MESSAGE: &str = "Vendor ID updated successfully";

/// Query and mutation operations over an injected record store.
pub struct TripEngine<S: RecordStore> {
    pub(crate) store: S,
}

impl<S: RecordStore> TripEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store (tests use this to reach counters).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Total number of trips in the dataset.
    pub fn get_count(&self) -> Result<i64> {
        self.store.count_trips()
    }

    /// First `limit` trip ids, for smoke-testing a deployment.
    pub fn get_sample(&self, limit: u32) -> Result<Vec<i64>> {
        self.store.sample_ids(limit)
    }

    /// Fetch a single trip by id.
    pub fn get_by_id(&self, trip_id: i64) -> Result<Trip> {
        if trip_id <= 0 {
            return Err(TripQueryError::Validation {
                field: "trip_id",
                message: format!("must be positive, got {trip_id}"),
            });
        }
        self.store
            .trip_by_id(trip_id)?
            .ok_or(TripQueryError::NotFound { trip_id })
    }

    /// Reassign a trip to a new vendor.
    ///
    /// Issues one conditional update and inspects the affected-row count,
    /// so there is no separate existence check to race against concurrent
    /// writers: zero rows affected means the trip does not exist, and a
    /// nonzero count means the new vendor id is already durable.
    pub fn update_vendor(&self, trip_id: i64, new_vendor_id: &str) -> Result<VendorUpdateReceipt> {
        if trip_id <= 0 {
            return Err(TripQueryError::Validation {
                field: "trip_id",
                message: format!("must be positive, got {trip_id}"),
            });
        }
        if new_vendor_id.trim().is_empty() {
            return Err(TripQueryError::Validation {
                field: "vendor_id",
                message: "must not be empty".to_string(),
            });
        }

        info!(
            "[update_vendor] trip {} -> vendor '{}'",
            trip_id, new_vendor_id
        );
        let affected = self.store.set_vendor(trip_id, new_vendor_id)?;
        if affected == 0 {
            debug!("[update_vendor] trip {} not found", trip_id);
            return Err(TripQueryError::NotFound { trip_id });
        }

        Ok(VendorUpdateReceipt {
            id: trip_id,
            vendor_id: new_vendor_id.to_string(),
            message: VENDOR_UPDATED_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;
    use crate::types::Trip;
    use chrono::NaiveDate;

    fn trip(id: i64, vendor: &str) -> Trip {
        let day = NaiveDate::from_ymd_opt(2016, 3, 14).unwrap();
        Trip {
            id,
            vendor_id: vendor.to_string(),
            pickup_time: day.and_hms_opt(9, 0, 0).unwrap(),
            dropoff_time: day.and_hms_opt(9, 30, 0).unwrap(),
        }
    }

    fn engine_with(trips: Vec<Trip>) -> TripEngine<MemoryRecordStore> {
        TripEngine::new(MemoryRecordStore::with_trips(trips))
    }

    #[test]
    fn test_get_by_id_rejects_non_positive_before_store() {
        let engine = engine_with(vec![trip(1, "CMT")]);
        engine.store().set_offline(true); // would fail if the store were hit

        assert!(matches!(
            engine.get_by_id(0),
            Err(TripQueryError::Validation { field: "trip_id", .. })
        ));
        assert!(matches!(
            engine.get_by_id(-5),
            Err(TripQueryError::Validation { .. })
        ));
    }

    #[test]
    fn test_get_by_id_distinguishes_not_found() {
        let engine = engine_with(vec![trip(1, "CMT")]);

        assert_eq!(engine.get_by_id(1).unwrap().vendor_id, "CMT");
        assert_eq!(
            engine.get_by_id(2),
            Err(TripQueryError::NotFound { trip_id: 2 })
        );
    }

    #[test]
    fn test_get_sample_returns_first_ids() {
        let engine = engine_with((1..=10).map(|i| trip(i, "CMT")).collect());
        assert_eq!(
            engine.get_sample(DEFAULT_SAMPLE_SIZE).unwrap(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_update_vendor_success_is_durable() {
        let engine = engine_with(vec![trip(1, "CMT")]);

        let receipt = engine.update_vendor(1, "VTS").unwrap();
        assert_eq!(receipt.id, 1);
        assert_eq!(receipt.vendor_id, "VTS");
        assert_eq!(receipt.message, "Vendor ID updated successfully");

        assert_eq!(engine.get_by_id(1).unwrap().vendor_id, "VTS");
    }

    #[test]
    fn test_update_vendor_missing_trip_is_not_found() {
        let engine = engine_with(vec![trip(1, "CMT")]);

        assert_eq!(
            engine.update_vendor(9, "VTS"),
            Err(TripQueryError::NotFound { trip_id: 9 })
        );
        // The surviving trip is untouched.
        assert_eq!(engine.get_by_id(1).unwrap().vendor_id, "CMT");
    }

    #[test]
    fn test_update_vendor_validation_issues_no_write() {
        let engine = engine_with(vec![trip(1, "CMT")]);

        assert!(matches!(
            engine.update_vendor(0, "VTS"),
            Err(TripQueryError::Validation { field: "trip_id", .. })
        ));
        assert!(matches!(
            engine.update_vendor(1, "   "),
            Err(TripQueryError::Validation { field: "vendor_id", .. })
        ));
        assert_eq!(engine.store().write_calls(), 0);
    }

    #[test]
    fn test_store_failures_propagate_unchanged() {
        let engine = engine_with(vec![trip(1, "CMT")]);
        engine.store().set_offline(true);

        let err = engine.update_vendor(1, "VTS").unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, TripQueryError::Unavailable { .. }));
    }
}
