//! Listing screen state and page envelopes.
//!
//! # Invariants
//! - `page >= 1` and `limit > 0` for every `ListingState` produced by the store.
//! - `items` only grows across successive pages of one query.

use serde::{Deserialize, Serialize};

/// Monotonic marker identifying one logical query of a listing screen.
///
/// Bumped on every new search and on deactivation; results stamped with an
/// older value are dropped.
pub type Generation = u64;

/// Snapshot of the accumulated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingState<T> {
    /// Items of every merged page, in page order.
    pub items: Vec<T>,
    /// Highest page merged so far.
    pub page: u32,
    /// Page size used by the query.
    pub limit: u32,
    /// Total number of items the query can return.
    pub total: u32,
}

impl<T> ListingState<T> {
    /// Empty first-page state used before any page arrives.
    pub fn empty(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            limit,
            total: 0,
        }
    }

    /// Returns whether another page exists: `total - limit * page > 0`.
    pub fn can_load_more(&self) -> bool {
        u64::from(self.total) > u64::from(self.limit) * u64::from(self.page)
    }
}

/// One page as returned by a listing source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u32,
}

/// Filter applied to a listing query.
///
/// Values are trimmed; blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Exact tag filter, matched case-insensitively by sources.
    pub tag: Option<String>,
    /// Free-text filter over item titles.
    pub keyword: Option<String>,
}

impl SearchCriteria {
    pub fn new(tag: Option<&str>, keyword: Option<&str>) -> Self {
        Self {
            tag: tag.and_then(normalize_criterion),
            keyword: keyword.and_then(normalize_criterion),
        }
    }

    /// Criteria filtering by one tag.
    pub fn by_tag(tag: &str) -> Self {
        Self::new(Some(tag), None)
    }

    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.keyword.is_none()
    }
}

fn normalize_criterion(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Page fetch issued by the pagination controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub criteria: Option<SearchCriteria>,
    /// Query generation the result must still match to be applied.
    pub generation: Generation,
}
