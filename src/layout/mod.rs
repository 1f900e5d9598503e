//! Thumbnail grid layout logic.
//!
//! The grid is a masonry layout: a fixed number of equally wide columns, where every photo goes
//! into whichever column is currently the shortest. The number of columns depends on the
//! viewport width only, so the layout survives height changes and scrolling untouched.
//!
//! The layout is computed in stages, each in its own module:
//!
//! 1. [`geometry`] turns the viewport width into a [`ColumnPlan`].
//! 2. [`pagination`] slices the catalog into pages sized for the plan.
//! 3. [`masonry`] places the photos of a page, asking [`density`] how many source pixels every
//!    thumbnail needs on the current screen.
//!
//! [`viewer`] sizes the full screen overlay for a single photo, also through [`density`].
//!
//! Everything here is synchronous and free of I/O: the functions take measurements and return
//! placements. Hooking them up to events is the job of [`crate::gallery::Gallery`].

use lightbox_config::Config;

pub mod density;
pub mod geometry;
pub mod masonry;
pub mod pagination;
pub mod types;
pub mod viewer;

pub use self::geometry::{ColumnPlan, ColumnTable};
pub use self::masonry::{MasonryLayout, PlacedItem};
pub use self::pagination::{PageCursor, Paginator};
pub use self::types::{Axis, DevicePixelRatio, Size, ViewportGeometry};
pub use self::viewer::{DensityClass, DisplayRequest, ViewerOptions, ViewerSummary};

/// Configurable properties of the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub gutter: u32,
    pub max_thumbnail_width: u32,
    pub columns: ColumnTable,
    pub paginate: bool,
    /// Screens worth of thumbnails per page.
    pub rows_per_page: u32,
    /// Remaining scroll distance below which the next page is placed.
    pub scroll_epsilon: f64,
    pub viewer: ViewerOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Options {
    pub fn from_config(config: &Config) -> Self {
        let gallery = &config.gallery;
        Self {
            gutter: gallery.gutter,
            max_thumbnail_width: gallery.max_thumbnail_width,
            columns: ColumnTable::from_config(gallery),
            paginate: !gallery.disable_pagination,
            rows_per_page: gallery.rows_per_page,
            scroll_epsilon: f64::from(gallery.scroll_epsilon),
            viewer: ViewerOptions::from_config(&config.viewer),
        }
    }

    pub fn column_plan(&self, viewport_width: u32) -> ColumnPlan {
        ColumnPlan::resolve(
            viewport_width,
            &self.columns,
            self.gutter,
            self.max_thumbnail_width,
        )
    }

    pub fn page_len(&self, plan: &ColumnPlan, viewport_height: u32, catalog_len: usize) -> usize {
        Paginator::page_len_for(
            plan,
            viewport_height,
            self.rows_per_page,
            self.paginate,
            catalog_len,
        )
    }
}
