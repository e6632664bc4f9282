//! In-memory record store for tests.
//!
//! Computes every operation over an ordered map with the same semantics as
//! the SQLite store (same duration filter, same tie-breaks), so engine
//! tests run without touching disk. Atomic counters record how many times
//! each operation class was called, letting tests assert which queries an
//! engine operation actually issued. A failure switch turns every call
//! into a store-unavailable error for propagation tests.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use chrono::Timelike;

use super::RecordStore;
use crate::error::{Result, TripQueryError};
use crate::types::{HourCount, Trip, VendorCount};

/// Test double over an ordered in-memory map, keyed by trip id.
#[derive(Default)]
pub struct MemoryRecordStore {
    trips: Mutex<BTreeMap<i64, Trip>>,
    offline: AtomicBool,

    // Per-operation call counters (single writer per test, relaxed is fine)
    count_calls: AtomicU32,
    window_calls: AtomicU32,
    aggregate_calls: AtomicU32,
    write_calls: AtomicU32,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-loaded with the given trips.
    pub fn with_trips(trips: Vec<Trip>) -> Self {
        let store = Self::new();
        {
            let mut map = store.trips.lock().unwrap();
            for trip in trips {
                map.insert(trip.id, trip);
            }
        }
        store
    }

    /// When set, every store call fails with an unavailable error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of `count_trips` calls seen so far.
    pub fn count_calls(&self) -> u32 {
        self.count_calls.load(Ordering::Relaxed)
    }

    /// Number of row-window fetches (`trips_from_offset` / `trips_after`).
    pub fn window_calls(&self) -> u32 {
        self.window_calls.load(Ordering::Relaxed)
    }

    /// Number of aggregate queries (avg, peak hour, vendor distribution).
    pub fn aggregate_calls(&self) -> u32 {
        self.aggregate_calls.load(Ordering::Relaxed)
    }

    /// Number of write statements issued.
    pub fn write_calls(&self) -> u32 {
        self.write_calls.load(Ordering::Relaxed)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(TripQueryError::Unavailable {
                message: "record store offline".to_string(),
            });
        }
        Ok(())
    }
}

impl RecordStore for MemoryRecordStore {
    fn count_trips(&self) -> Result<i64> {
        self.check_online()?;
        self.count_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.trips.lock().unwrap().len() as i64)
    }

    fn sample_ids(&self, limit: u32) -> Result<Vec<i64>> {
        self.check_online()?;
        self.window_calls.fetch_add(1, Ordering::Relaxed);
        let map = self.trips.lock().unwrap();
        Ok(map.keys().take(limit as usize).copied().collect())
    }

    fn trip_by_id(&self, id: i64) -> Result<Option<Trip>> {
        self.check_online()?;
        Ok(self.trips.lock().unwrap().get(&id).cloned())
    }

    fn trips_from_offset(&self, offset: u64, limit: u32) -> Result<Vec<Trip>> {
        self.check_online()?;
        self.window_calls.fetch_add(1, Ordering::Relaxed);
        let map = self.trips.lock().unwrap();
        Ok(map
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn trips_after(&self, cursor: i64, limit: u32) -> Result<Vec<Trip>> {
        self.check_online()?;
        self.window_calls.fetch_add(1, Ordering::Relaxed);
        let map = self.trips.lock().unwrap();
        Ok(map
            .range((Bound::Excluded(cursor), Bound::Unbounded))
            .take(limit as usize)
            .map(|(_, trip)| trip.clone())
            .collect())
    }

    fn avg_duration_minutes(&self) -> Result<Option<f64>> {
        self.check_online()?;
        self.aggregate_calls.fetch_add(1, Ordering::Relaxed);
        let map = self.trips.lock().unwrap();
        let durations: Vec<f64> = map
            .values()
            .filter(|t| t.dropoff_time > t.pickup_time)
            .map(|t| (t.dropoff_time - t.pickup_time).num_seconds() as f64 / 60.0)
            .collect();
        if durations.is_empty() {
            return Ok(None);
        }
        Ok(Some(durations.iter().sum::<f64>() / durations.len() as f64))
    }

    fn peak_pickup_hour(&self) -> Result<Option<HourCount>> {
        self.check_online()?;
        self.aggregate_calls.fetch_add(1, Ordering::Relaxed);
        let map = self.trips.lock().unwrap();
        let mut by_hour: BTreeMap<u32, i64> = BTreeMap::new();
        for trip in map.values() {
            *by_hour.entry(trip.pickup_time.hour()).or_insert(0) += 1;
        }
        // Ascending iteration + strict > keeps the lowest hour on ties.
        let mut peak: Option<HourCount> = None;
        for (hour, trip_count) in by_hour {
            if peak.as_ref().map_or(true, |p| trip_count > p.trip_count) {
                peak = Some(HourCount { hour, trip_count });
            }
        }
        Ok(peak)
    }

    fn vendor_distribution(&self, limit: u32) -> Result<Vec<VendorCount>> {
        self.check_online()?;
        self.aggregate_calls.fetch_add(1, Ordering::Relaxed);
        let map = self.trips.lock().unwrap();
        let mut by_vendor: HashMap<String, i64> = HashMap::new();
        for trip in map.values() {
            *by_vendor.entry(trip.vendor_id.clone()).or_insert(0) += 1;
        }
        let mut counts: Vec<VendorCount> = by_vendor
            .into_iter()
            .map(|(vendor_id, trip_count)| VendorCount {
                vendor_id,
                trip_count,
            })
            .collect();
        counts.sort_by(|a, b| {
            b.trip_count
                .cmp(&a.trip_count)
                .then_with(|| a.vendor_id.cmp(&b.vendor_id))
        });
        counts.truncate(limit as usize);
        Ok(counts)
    }

    fn set_vendor(&self, trip_id: i64, vendor_id: &str) -> Result<usize> {
        self.check_online()?;
        self.write_calls.fetch_add(1, Ordering::Relaxed);
        let mut map = self.trips.lock().unwrap();
        match map.get_mut(&trip_id) {
            Some(trip) => {
                trip.vendor_id = vendor_id.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(id: i64, vendor: &str, pickup_hour: u32) -> Trip {
        let day = NaiveDate::from_ymd_opt(2016, 3, 14).unwrap();
        Trip {
            id,
            vendor_id: vendor.to_string(),
            pickup_time: day.and_hms_opt(pickup_hour, 0, 0).unwrap(),
            dropoff_time: day.and_hms_opt(pickup_hour, 20, 0).unwrap(),
        }
    }

    #[test]
    fn test_windows_match_sqlite_semantics() {
        let store = MemoryRecordStore::with_trips((1..=10).map(|i| trip(i, "A", 9)).collect());

        let ids: Vec<i64> = store
            .trips_from_offset(3, 4)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![4, 5, 6, 7]);

        let ids: Vec<i64> = store
            .trips_after(7, 10)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![8, 9, 10]);
    }

    #[test]
    fn test_counters_track_operation_classes() {
        let store = MemoryRecordStore::with_trips(vec![trip(1, "A", 9)]);

        store.count_trips().unwrap();
        store.trips_after(0, 5).unwrap();
        store.vendor_distribution(10).unwrap();
        store.set_vendor(1, "B").unwrap();

        assert_eq!(store.count_calls(), 1);
        assert_eq!(store.window_calls(), 1);
        assert_eq!(store.aggregate_calls(), 1);
        assert_eq!(store.write_calls(), 1);
    }

    #[test]
    fn test_offline_switch_fails_every_call() {
        let store = MemoryRecordStore::with_trips(vec![trip(1, "A", 9)]);
        store.set_offline(true);

        assert!(matches!(
            store.count_trips(),
            Err(TripQueryError::Unavailable { .. })
        ));
        assert!(matches!(
            store.set_vendor(1, "B"),
            Err(TripQueryError::Unavailable { .. })
        ));

        store.set_offline(false);
        assert_eq!(store.count_trips().unwrap(), 1);
    }
}
