//! # Tripquery
//!
//! Paginated query and analytics layer over a large, append-mostly trip
//! dataset. This crate is the layer a transport (HTTP router, RPC service)
//! calls into; it owns the windowing arithmetic, the aggregation pipeline,
//! and the one permitted mutation, and delegates storage to an injected
//! [`RecordStore`].
//!
//! This library provides:
//! - Offset ("page") and keyset ("cursor") pagination over the id-ordered
//!   trip set, with look-ahead-row `has_next` detection
//! - A four-metric analytics report (count, average duration, peak pickup
//!   hour, vendor distribution) computed store-side
//! - A race-free vendor reassignment via conditional update
//! - A SQLite record store and an in-memory test double behind one trait
//!
//! ## Quick Start
//!
//! ```rust
//! use tripquery::{CursorRequest, MemoryRecordStore, TripEngine};
//!
//! let engine = TripEngine::new(MemoryRecordStore::new());
//! let window = engine.list_by_cursor(&CursorRequest::default()).unwrap();
//! assert!(window.trips.is_empty());
//! assert!(!window.pagination.has_next);
//! ```

// Unified error handling
pub mod error;
pub use error::{Result, TripQueryError};

// Data containers for trips, windows, and reports
pub mod types;
pub use types::{
    CursorPage, CursorPageInfo, CursorRequest, HourCount, PageInfo, PageRequest, Trip,
    TripAnalytics, TripPage, VendorCount, VendorUpdateReceipt, TIMESTAMP_FORMAT,
};

// Record store boundary (real SQLite store + in-memory test double)
pub mod store;
pub use store::{MemoryRecordStore, RecordStore, SqliteRecordStore};

// Versioned schema for the SQLite store
pub mod migrations;

// Engine: lookups and the vendor mutation
pub mod engine;
pub use engine::{TripEngine, DEFAULT_SAMPLE_SIZE};

// Page/cursor windowing
pub mod pagination;
pub use pagination::{COUNT_NOT_COMPUTED, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

// Analytics aggregation
pub mod analytics;
pub use analytics::TOP_VENDOR_COUNT;
