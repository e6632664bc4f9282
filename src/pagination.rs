//! Page- and cursor-based windowing over the ordered trip set.
//!
//! Both modes share one ordering contract (ascending `id`) and the same
//! look-ahead trick: fetch `page_size + 1` rows and let the extra row
//! answer "is there more?" without a second query.
//!
//! - **Page mode** skips `(page - 1) * page_size` rows, so its cost grows
//!   with the page number. It can optionally report exact totals via a
//!   separate count query.
//! - **Cursor mode** seeks on `id > cursor`, so its cost depends only on
//!   `page_size`. It never counts and never scans — that is its entire
//!   reason for existing.
//!
//! When a count runs, count and window are two separate store calls with
//! no snapshot between them; under concurrent writes they may disagree by
//! a few rows. The layer favors availability over cross-query consistency.

use log::debug;

use crate::error::{Result, TripQueryError};
use crate::store::RecordStore;
use crate::types::{CursorPage, CursorPageInfo, CursorRequest, PageInfo, PageRequest, TripPage};
use crate::TripEngine;

/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: u32 = 1;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 1000;
/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Sentinel reported for `total_count`/`total_pages` when the count query
/// was skipped. Distinct from zero: -1 means "not computed".
pub const COUNT_NOT_COMPUTED: i64 = -1;

impl<S: RecordStore> TripEngine<S> {
    /// Offset pagination: fetch page `req.page` of the trip set.
    ///
    /// Totals are exact only when `include_count` is set; otherwise both
    /// report [`COUNT_NOT_COMPUTED`] and no count query runs.
    pub fn list_by_page(&self, req: &PageRequest) -> Result<TripPage> {
        validate_page_size(req.page_size)?;
        if req.page < 1 {
            return Err(TripQueryError::Validation {
                field: "page",
                message: format!("must be >= 1, got {}", req.page),
            });
        }

        debug!(
            "[list_by_page] page={} page_size={} include_count={}",
            req.page, req.page_size, req.include_count
        );

        let (total_count, total_pages) = if req.include_count {
            let count = self.store.count_trips()?;
            (count, pages_for(count, req.page_size))
        } else {
            (COUNT_NOT_COMPUTED, COUNT_NOT_COMPUTED)
        };

        let offset = (req.page as u64 - 1) * req.page_size as u64;
        let mut trips = self.store.trips_from_offset(offset, req.page_size + 1)?;

        let has_next = trips.len() > req.page_size as usize;
        trips.truncate(req.page_size as usize);
        let has_previous = req.page > 1;

        let next_cursor = if has_next {
            trips.last().map(|t| t.id)
        } else {
            None
        };
        let previous_cursor = if has_previous {
            trips.first().map(|t| (t.id - req.page_size as i64).max(0))
        } else {
            None
        };

        Ok(TripPage {
            pagination: PageInfo {
                page: req.page,
                page_size: req.page_size,
                total_pages,
                total_count,
                has_next,
                has_previous,
                next_cursor,
                previous_cursor,
            },
            trips,
        })
    }

    /// Keyset pagination: fetch the window after `req.cursor`.
    ///
    /// Cost is proportional to `page_size` regardless of how deep into the
    /// dataset the cursor points.
    pub fn list_by_cursor(&self, req: &CursorRequest) -> Result<CursorPage> {
        validate_page_size(req.page_size)?;
        if req.cursor < 0 {
            return Err(TripQueryError::Validation {
                field: "cursor",
                message: format!("must be >= 0, got {}", req.cursor),
            });
        }

        debug!(
            "[list_by_cursor] cursor={} page_size={}",
            req.cursor, req.page_size
        );

        let mut trips = self.store.trips_after(req.cursor, req.page_size + 1)?;

        let has_next = trips.len() > req.page_size as usize;
        trips.truncate(req.page_size as usize);
        let has_previous = req.cursor > 0;

        let next_cursor = if has_next {
            trips.last().map(|t| t.id)
        } else {
            None
        };
        let previous_cursor = if has_previous {
            Some((req.cursor - req.page_size as i64).max(0))
        } else {
            None
        };

        Ok(CursorPage {
            pagination: CursorPageInfo {
                page_size: req.page_size,
                has_next,
                has_previous,
                next_cursor,
                previous_cursor,
            },
            trips,
        })
    }
}

fn validate_page_size(page_size: u32) -> Result<()> {
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(TripQueryError::Validation {
            field: "page_size",
            message: format!(
                "must be between {} and {}, got {}",
                MIN_PAGE_SIZE, MAX_PAGE_SIZE, page_size
            ),
        });
    }
    Ok(())
}

/// Ceiling division of a row count into pages.
fn pages_for(total_count: i64, page_size: u32) -> i64 {
    (total_count + page_size as i64 - 1) / page_size as i64
}
