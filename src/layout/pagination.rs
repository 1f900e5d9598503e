//! Catalog pagination.
//!
//! Only a bounded slice of the catalog is placed at a time. The first page is placed on load,
//! and every scroll to the bottom of the grid places the next one, until the catalog runs out.

use std::ops::Range;

use super::geometry::ColumnPlan;
use crate::catalog::Handle;

/// Position of the paginator in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
    /// Index of the next page to hand out.
    Page(usize),
    /// Every page has been handed out.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    catalog_len: usize,
    /// Number of photos per page. Non-zero unless the catalog is empty.
    page_len: usize,
    total_pages: usize,
    cursor: PageCursor,
}

impl Paginator {
    pub fn new(catalog_len: usize, page_len: usize) -> Self {
        let mut paginator = Self {
            catalog_len,
            page_len: 0,
            total_pages: 0,
            cursor: PageCursor::Exhausted,
        };
        paginator.set_page_len(page_len);
        paginator
    }

    /// Page length for a column plan.
    ///
    /// A page holds `rows_per_page` screens worth of thumbnails, estimating a row as a square
    /// thumbnail. Without pagination, a page is the whole catalog.
    pub fn page_len_for(
        plan: &ColumnPlan,
        viewport_height: u32,
        rows_per_page: u32,
        paginate: bool,
        catalog_len: usize,
    ) -> usize {
        if !paginate {
            return catalog_len;
        }

        let rows = viewport_height.div_ceil(plan.column_width).max(1) as usize;
        rows * plan.column_count as usize * rows_per_page.max(1) as usize
    }

    /// Changes the page length and rewinds to the first page.
    pub fn set_page_len(&mut self, page_len: usize) {
        self.page_len = if self.catalog_len == 0 {
            0
        } else {
            page_len.clamp(1, self.catalog_len)
        };
        self.total_pages = if self.page_len == 0 {
            0
        } else {
            self.catalog_len.div_ceil(self.page_len)
        };
        self.reset();
    }

    /// Rewinds to the first page.
    pub fn reset(&mut self) {
        self.cursor = if self.total_pages > 0 {
            PageCursor::Page(0)
        } else {
            PageCursor::Exhausted
        };
    }

    /// Returns the handles of the current page and advances to the next one.
    ///
    /// Returns an empty list once exhausted.
    pub fn next_page(&mut self) -> Vec<Handle> {
        self.next_range().map(Handle).collect()
    }

    fn next_range(&mut self) -> Range<usize> {
        let PageCursor::Page(page) = self.cursor else {
            return 0..0;
        };

        let start = page * self.page_len;
        let end = usize::min(start + self.page_len, self.catalog_len);

        self.cursor = if page + 1 < self.total_pages {
            PageCursor::Page(page + 1)
        } else {
            PageCursor::Exhausted
        };

        start..end
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == PageCursor::Exhausted
    }

    pub fn page_len(&self) -> usize {
        self.page_len
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }
}
