//! Product table pagination
//!
//! Effective page size: a positive custom size wins over the preset, a preset
//! wins over "all". The page number may hold an out-of-range value while the
//! user is typing; it is clamped only on commit.

use serde::Serialize;
use shared::money;

/// Preset page sizes offered next to the "all" button
pub const PAGE_SIZE_PRESETS: [usize; 2] = [10, 25];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Preset(usize),
    All,
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Preset(25)
    }
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Self::Preset(n)),
            _ => Err(format!("invalid page size: {}", s)),
        }
    }
}

/// `max(1, ceil(count / limit))`; unlimited pages hold everything
pub fn total_pages(count: usize, limit: Option<usize>) -> usize {
    match limit {
        Some(n) if n > 0 => count.div_ceil(n).max(1),
        _ => 1,
    }
}

/// One page of rows plus the numbers needed to draw the pager
#[derive(Debug, Clone, Serialize)]
pub struct PageWindow<'a, T> {
    pub page: i64,
    pub total_pages: usize,
    /// Rows per page, `None` when showing everything
    pub page_size: Option<usize>,
    pub total_rows: usize,
    pub rows: &'a [T],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    preset: PageSize,
    custom: String,
    page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            preset: PageSize::default(),
            custom: String::new(),
            page: 1,
        }
    }
}

impl Pagination {
    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn preset(&self) -> PageSize {
        self.preset
    }

    pub fn custom(&self) -> &str {
        &self.custom
    }

    /// Rows per page, `None` for "all"
    pub fn limit(&self) -> Option<usize> {
        let custom = money::parse_quantity(&self.custom)
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok());
        custom.or(match self.preset {
            PageSize::Preset(n) if n > 0 => Some(n),
            _ => None,
        })
    }

    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.limit())
    }

    /// Choose a preset (or "all"); clears the custom size and returns to page 1
    pub fn set_preset(&mut self, size: PageSize) {
        self.preset = size;
        self.custom.clear();
        self.page = 1;
    }

    /// Custom size as typed; non-positive or unparsable input falls back to the preset
    pub fn set_custom(&mut self, raw: impl Into<String>) {
        self.custom = raw.into();
        self.page = 1;
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Keystroke in the page field: stored as typed, unparsable becomes 1
    pub fn type_page(&mut self, raw: &str) {
        self.page = money::parse_quantity(raw).unwrap_or(1);
    }

    /// Blur or Enter in the page field: clamp into `[1, total_pages]`
    pub fn commit_page(&mut self, raw: &str, count: usize) {
        self.type_page(raw);
        self.clamp(count);
    }

    pub fn clamp(&mut self, count: usize) {
        let last = self.last(count);
        self.page = self.page.clamp(1, last);
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn prev_page(&mut self, count: usize) {
        self.page = self.page.saturating_sub(1).clamp(1, self.last(count));
    }

    pub fn next_page(&mut self, count: usize) {
        self.page = self.page.saturating_add(1).clamp(1, self.last(count));
    }

    pub fn last_page(&mut self, count: usize) {
        self.page = self.last(count);
    }

    fn last(&self, count: usize) -> i64 {
        i64::try_from(self.total_pages(count)).unwrap_or(i64::MAX)
    }

    /// Rows of the current page; an out-of-range page yields no rows
    pub fn window<'a, T>(&self, rows: &'a [T]) -> PageWindow<'a, T> {
        let limit = self.limit();
        let slice = match limit {
            None => rows,
            Some(n) => usize::try_from(self.page - 1)
                .ok()
                .and_then(|index| index.checked_mul(n))
                .filter(|start| *start < rows.len())
                .map(|start| &rows[start..(start + n).min(rows.len())])
                .unwrap_or(&[]),
        };
        PageWindow {
            page: self.page,
            total_pages: total_pages(rows.len(), limit),
            page_size: limit,
            total_rows: rows.len(),
            rows: slice,
        }
    }
}
