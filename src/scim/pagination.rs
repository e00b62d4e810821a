//! SCIM 2.0 List Pagination
//!
//! Index-based pagination per RFC 7644 Section 3.4.2.4, applied after
//! filtering. The window is 1-based and inclusive; out-of-range requests
//! degrade to an empty page rather than an error, and totalResults always
//! reflects the filtered set regardless of the window.

use super::types::ScimListResponse;

/// Default 1-based index of the first result when startIndex is absent
pub const DEFAULT_START_INDEX: i64 = 1;

/// Default page size when count is absent
pub const DEFAULT_COUNT: i64 = 20;

/// Slice a result set into a SCIM list envelope.
///
/// A non-positive startIndex is treated as 1. A negative count is treated as
/// zero, so an explicit `count=0` (or less) yields an empty page while still
/// reporting the full totalResults.
pub fn paginate<T>(
    resources: Vec<T>,
    start_index: Option<i64>,
    count: Option<i64>,
) -> ScimListResponse<T> {
    let total_results = resources.len() as u32;
    let start = start_index.unwrap_or(DEFAULT_START_INDEX).max(1);
    let count = count.unwrap_or(DEFAULT_COUNT).max(0);

    let page: Vec<T> = resources
        .into_iter()
        .skip(start as usize - 1)
        .take(count as usize)
        .collect();

    ScimListResponse::new(page, total_results, start.try_into().unwrap_or(u32::MAX))
}
