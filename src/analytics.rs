//! Multi-metric analytics aggregation.
//!
//! Four independent store queries — total count, average duration, peak
//! pickup hour, vendor distribution — assembled into one report. Each
//! metric can be re-derived in isolation; none of them shares a query with
//! another. Nothing is cached: every call re-aggregates the live dataset,
//! and all grouping/averaging runs inside the store so the report costs
//! four aggregate queries no matter how many rows exist.

use log::debug;

use crate::error::Result;
use crate::store::RecordStore;
use crate::types::{HourCount, TripAnalytics};
use crate::TripEngine;

/// Number of vendors the distribution reports, counted from the top.
pub const TOP_VENDOR_COUNT: u32 = 10;

impl<S: RecordStore> TripEngine<S> {
    /// Compute the full analytics report over the live dataset.
    pub fn get_analytics(&self) -> Result<TripAnalytics> {
        debug!("[get_analytics] aggregating trip metrics");

        let total_trips = self.store.count_trips()?;
        let avg_minutes = self.store.avg_duration_minutes()?.unwrap_or(0.0);
        let peak = self
            .store
            .peak_pickup_hour()?
            .unwrap_or(HourCount { hour: 0, trip_count: 0 });
        let vendor_distribution = self.store.vendor_distribution(TOP_VENDOR_COUNT)?;

        Ok(TripAnalytics {
            total_trips,
            avg_trip_duration_minutes: round_to_hundredths(avg_minutes),
            peak_hour: peak.hour,
            peak_hour_trip_count: peak.trip_count,
            vendor_distribution,
        })
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
