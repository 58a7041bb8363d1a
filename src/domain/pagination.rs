//! Pagination and de-duplication over extracted result sets.
//!
//! Responsibility:
//! - 1-based page/limit 슬라이싱과 메타 정보 계산 (저장하지 않고 항상 재계산)
//! - (book, liquor) 기준 첫 번째 항목만 남기는 중복 제거

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::recipe::RecipeIdentity;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// `page` and `limit` are clamped to at least 1 so the page count stays finite.
    pub fn new(total: usize, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = u32::try_from(total.div_ceil(limit as usize)).unwrap_or(u32::MAX);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Index range of this page inside the full result set; empty when out of range.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page as usize - 1).saturating_mul(self.limit as usize);
        let end = start.saturating_add(self.limit as usize);
        start.min(self.total)..end.min(self.total)
    }
}

/// List envelope handed to the API layer: `{ data, meta }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Slice `items` to the 1-based `page` of size `limit`.
/// An out-of-range page yields an empty slice with correct meta, never an error.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Paginated<T> {
    let meta = PaginationMeta::new(items.len(), page, limit);
    let range = meta.range();

    let data = items
        .into_iter()
        .skip(range.start)
        .take(range.end - range.start)
        .collect();

    Paginated { data, meta }
}

/// Keep the first record per (book, liquor) in original order; later duplicates are dropped, not merged.
pub fn dedup_by_identity<T: RecipeIdentity>(items: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(items.len());

    items
        .into_iter()
        .filter(|item| {
            let key = (item.book().to_string(), item.liquor().to_string());
            if seen.contains(&key) {
                tracing::debug!("Removing duplicate recipe: {} - {}", key.0, key.1);
                false
            } else {
                seen.insert(key);
                true
            }
        })
        .collect()
}
