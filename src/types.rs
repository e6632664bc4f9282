//! Data types for trip queries, pagination windows, and analytics reports.
//!
//! These are data containers shared by the engine, the store boundary, and
//! whatever transport layer sits on top. Page and cursor windows are
//! ephemeral values computed per request; only `Trip` corresponds to a
//! persisted row.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used in the trips table, chosen so the store can run
/// `julianday`/`strftime` aggregation directly on the column text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Trip
// ============================================================================

/// A single trip record, projected to the four queryable fields.
///
/// `id` is assigned by insertion order and never reused; it is the only
/// stable identity pagination and mutation rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i64,
    /// Short operator/category identifier
    pub vendor_id: String,
    pub pickup_time: NaiveDateTime,
    /// Expected, but not guaranteed, to be >= pickup_time
    pub dropoff_time: NaiveDateTime,
}

// ============================================================================
// Pagination Requests
// ============================================================================

/// Parameters for page-based (offset) pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Rows per page (1..=1000)
    pub page_size: u32,
    /// Whether to run the separate full-table count query
    pub include_count: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
            include_count: true,
        }
    }
}

/// Parameters for cursor-based (keyset) pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorRequest {
    /// Return trips with id strictly greater than this; 0 means "from the start"
    pub cursor: i64,
    /// Rows per fetch (1..=1000)
    pub page_size: u32,
}

impl Default for CursorRequest {
    fn default() -> Self {
        Self {
            cursor: 0,
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
        }
    }
}

// ============================================================================
// Pagination Windows
// ============================================================================

/// Metadata for a page-mode window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page number that was requested
    pub page: u32,
    pub page_size: u32,
    /// Total pages, or -1 when the count query was skipped
    pub total_pages: i64,
    /// Total rows, or -1 when the count query was skipped
    pub total_count: i64,
    pub has_next: bool,
    pub has_previous: bool,
    /// Id of the last returned row, present only when more data follows
    pub next_cursor: Option<i64>,
    /// Approximate jump-back hint (`first_id - page_size`, clamped to 0);
    /// exact only when ids are dense
    pub previous_cursor: Option<i64>,
}

/// Metadata for a cursor-mode window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPageInfo {
    pub page_size: u32,
    pub has_next: bool,
    pub has_previous: bool,
    /// Id of the last returned row, present only when more data follows
    pub next_cursor: Option<i64>,
    /// Approximate jump-back hint (`cursor - page_size`, clamped to 0);
    /// exact only when ids are dense
    pub previous_cursor: Option<i64>,
}

/// One page-mode result window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPage {
    pub trips: Vec<Trip>,
    pub pagination: PageInfo,
}

/// One cursor-mode result window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage {
    pub trips: Vec<Trip>,
    pub pagination: CursorPageInfo,
}

// ============================================================================
// Analytics
// ============================================================================

/// Trip count for one pickup hour of day (0-23).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    pub hour: u32,
    pub trip_count: i64,
}

/// Trip count for one vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCount {
    pub vendor_id: String,
    pub trip_count: i64,
}

/// Aggregated analytics report, recomputed from the live dataset on every
/// request. The four metrics come from four independent queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAnalytics {
    pub total_trips: i64,
    /// Mean duration in minutes over trips with dropoff > pickup,
    /// rounded to 2 decimal places; 0.0 when no trip qualifies
    pub avg_trip_duration_minutes: f64,
    /// Pickup hour (0-23) with the most trips; 0 on an empty dataset
    pub peak_hour: u32,
    pub peak_hour_trip_count: i64,
    /// Top vendors by trip count, descending, at most 10 entries
    pub vendor_distribution: Vec<VendorCount>,
}

// ============================================================================
// Vendor Mutation
// ============================================================================

/// Confirmation returned by a successful vendor update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorUpdateReceipt {
    pub id: i64,
    /// The vendor id now durably stored on the trip
    pub vendor_id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_trip_serializes_camel_case() {
        let trip = Trip {
            id: 7,
            vendor_id: "CMT".to_string(),
            pickup_time: ts(9, 0),
            dropoff_time: ts(9, 30),
        };
        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["vendorId"], "CMT");
        assert_eq!(json["pickupTime"], "2016-03-14T09:00:00");
        assert!(json.get("vendor_id").is_none());
    }

    #[test]
    fn test_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 100);
        assert!(req.include_count);

        let req = CursorRequest::default();
        assert_eq!(req.cursor, 0);
        assert_eq!(req.page_size, 100);
    }

    #[test]
    fn test_timestamp_format_round_trips() {
        let t = ts(23, 59);
        let raw = t.format(TIMESTAMP_FORMAT).to_string();
        assert_eq!(raw, "2016-03-14 23:59:00");
        let parsed = NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).unwrap();
        assert_eq!(parsed, t);
    }
}
