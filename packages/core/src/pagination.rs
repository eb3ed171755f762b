// ABOUTME: Pagination utilities for list endpoints
// ABOUTME: Offset/limit query parameters and the paginated response wrapper

use serde::{Deserialize, Serialize};

/// Default page size for paginated queries
pub const DEFAULT_LIMIT: i64 = 100;

/// Maximum page size to prevent performance issues
pub const MAX_LIMIT: i64 = 1000;

/// Query parameters for pagination
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    /// Number of items to skip (defaults to 0)
    #[serde(default)]
    pub offset: i64,

    /// Number of items to return (defaults to DEFAULT_LIMIT, max MAX_LIMIT)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl PaginationParams {
    /// Create new pagination params with defaults
    pub fn new() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Create pagination params with custom values
    pub fn with_offset_and_limit(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// Validate and normalize pagination parameters
    /// Returns (limit, offset) suitable for SQL queries
    pub fn validate(&self) -> (i64, i64) {
        let limit = self.limit.clamp(1, MAX_LIMIT);
        let offset = self.offset.max(0);
        (limit, offset)
    }

    /// Get SQL LIMIT clause value
    pub fn limit(&self) -> i64 {
        self.validate().0
    }

    /// Get SQL OFFSET clause value
    pub fn offset(&self) -> i64 {
        self.validate().1
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata about pagination state
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub offset: i64,
    pub limit: i64,
    pub total_items: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from params and total count
    pub fn new(params: &PaginationParams, returned: usize, total_items: i64) -> Self {
        let offset = params.offset();
        Self {
            offset,
            limit: params.limit(),
            total_items,
            has_more: offset + (returned as i64) < total_items,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    /// The data items for the current page
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(data: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        let pagination = PaginationMeta::new(params, data.len(), total_items);
        Self { data, pagination }
    }

    /// Convert each item, keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
