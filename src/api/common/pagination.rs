//
//  crm-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for list endpoints
//!
//! List endpoints page with two query filters: `_limit` (page size) and
//! `_skip` (offset). The response carries the page under `data` and reports
//! `has_more` / `total_results` as metadata next to it.
//!
//! Pagination is entirely caller-driven: nothing in the client follows
//! cursors automatically. Use [`Page::next_request`] to compute the filters
//! for the following page.
//!
//! # Example
//!
//! ```rust
//! use crm_client::api::common::{Page, PageRequest};
//!
//! let request = PageRequest::new().limit(2);
//! let page = Page { items: vec!["a", "b"], has_more: true, total_results: Some(5) };
//!
//! let next = page.next_request(&request).unwrap();
//! assert_eq!(next.skip, Some(2));
//! assert_eq!(next.limit, Some(2));
//! ```

use serde::Serialize;

use crate::api::request::QueryFilters;

/// Query filter carrying the page size.
pub const LIMIT_FILTER: &str = "_limit";

/// Query filter carrying the page offset.
pub const SKIP_FILTER: &str = "_skip";

/// Metadata key reporting whether further pages exist.
pub const HAS_MORE_KEY: &str = "has_more";

/// Metadata key reporting the total number of matching records.
pub const TOTAL_RESULTS_KEY: &str = "total_results";

/// Caller-supplied page cursor.
///
/// Zero or absent values are omitted from the request entirely rather than
/// sent as a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of records to return.
    pub limit: Option<u32>,
    /// Number of records to skip.
    pub skip: Option<u32>,
}

impl PageRequest {
    /// An empty request: the server's default page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset.
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Appends `_limit` and `_skip` to `filters`, skipping zero values.
    pub fn apply(&self, filters: &mut QueryFilters) {
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            filters.insert(LIMIT_FILTER, limit.to_string());
        }
        if let Some(skip) = self.skip.filter(|s| *s > 0) {
            filters.insert(SKIP_FILTER, skip.to_string());
        }
    }

    /// Renders the request as a fresh filter list.
    pub fn to_filters(&self) -> QueryFilters {
        let mut filters = QueryFilters::new();
        self.apply(&mut filters);
        filters
    }
}

/// One page of records returned by a list endpoint.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `items` | `Vec<T>` | Records of this page, in server order |
/// | `has_more` | `bool` | Whether another page exists |
/// | `total_results` | `Option<u64>` | Total matching records, when reported |
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    /// Records in this page.
    pub items: Vec<T>,

    /// Whether the server reported more records after this page.
    pub has_more: bool,

    /// Total number of matching records, when the server reports it.
    pub total_results: Option<u64>,
}

impl<T> Page<T> {
    /// Checks if there are more pages of results available.
    pub fn has_next(&self) -> bool {
        self.has_more
    }

    /// Computes the cursor for the page following this one.
    ///
    /// Returns `None` when the server reported no further pages.
    pub fn next_request(&self, current: &PageRequest) -> Option<PageRequest> {
        if !self.has_more {
            return None;
        }
        let consumed = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
        Some(PageRequest {
            limit: current.limit,
            skip: Some(current.skip.unwrap_or(0).saturating_add(consumed)),
        })
    }
}
