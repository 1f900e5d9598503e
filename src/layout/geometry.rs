//! Column plan resolution.
//!
//! Turns the viewport width into the number and width of grid columns. Wide viewports get
//! more columns rather than wider thumbnails once the thumbnail width cap is hit.

use lightbox_config::Gallery;
use tracing::warn;

/// Lookup from viewport width to column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTable {
    /// Column count for each 100px band of viewport width. Non-empty and non-decreasing.
    bands: Vec<u32>,
    /// Viewports narrower than this get a single column.
    min_width: u32,
    /// Viewports wider than this get `max_columns` columns.
    max_width: u32,
    max_columns: u32,
}

impl ColumnTable {
    pub const BAND_WIDTH: u32 = 100;

    pub fn from_config(config: &Gallery) -> Self {
        let mut bands = config.responsive_columns.0.clone();
        if bands.is_empty() {
            warn!("empty responsive column table, using the default one");
            bands = lightbox_config::ResponsiveColumns::default().0;
        }

        // The config decoder rejects decreasing tables, but a Gallery can also be built in
        // code.
        let mut max = 0;
        for count in &mut bands {
            if *count < max {
                warn!("responsive column table decreases, raising {count} to {max}");
                *count = max;
            }
            max = *count;
        }

        Self {
            bands,
            min_width: config.min_viewport_width,
            max_width: config.max_viewport_width,
            max_columns: config.max_columns.max(1),
        }
    }

    /// Recommended column count for a viewport width. Always at least 1.
    pub fn column_count(&self, viewport_width: u32) -> u32 {
        if viewport_width < self.min_width {
            return 1;
        }
        if viewport_width > self.max_width {
            return self.max_columns;
        }

        let band = (viewport_width / Self::BAND_WIDTH) as usize;
        // Non-empty by construction.
        let count = self.bands.get(band).or(self.bands.last()).copied().unwrap_or(1);
        count.max(1)
    }
}

impl Default for ColumnTable {
    fn default() -> Self {
        Self::from_config(&Gallery::default())
    }
}

/// How the thumbnail grid is split into columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Number of columns. At least 1.
    pub column_count: u32,
    /// Width of every column and of every thumbnail in it. At least 1.
    pub column_width: u32,
    /// Gap between columns and around the grid.
    pub gutter: u32,
    /// Offset of the grid's left edge that centers it in the viewport.
    pub horizontal_offset: u32,
}

impl ColumnPlan {
    pub fn resolve(
        viewport_width: u32,
        table: &ColumnTable,
        gutter: u32,
        max_column_width: u32,
    ) -> Self {
        let mut column_count = table.column_count(viewport_width);

        let total_gutter = i64::from(gutter) * (i64::from(column_count) + 1);
        let available = i64::from(viewport_width) - total_gutter;

        let column_width = if available < i64::from(column_count) {
            // Not even one pixel per column: give up on columns and use all the space that's
            // left between two gutters.
            column_count = 1;
            viewport_width.saturating_sub(gutter.saturating_mul(2)).max(1)
        } else {
            // Fits in u32 since it's at most viewport_width.
            (available / i64::from(column_count)) as u32
        };

        let column_width = column_width.min(max_column_width).max(1);

        let mut plan = Self {
            column_count,
            column_width,
            gutter,
            horizontal_offset: 0,
        };
        plan.horizontal_offset = viewport_width.saturating_sub(plan.gallery_width()) / 2;
        plan
    }

    /// Total width of the columns and all gutters.
    pub fn gallery_width(&self) -> u32 {
        let columns = self.column_width.saturating_mul(self.column_count);
        let gutters = self.column_count.saturating_add(1).saturating_mul(self.gutter);
        columns.saturating_add(gutters)
    }

    /// X coordinate of the left edge of a column.
    pub fn column_x(&self, column: usize) -> u32 {
        let column = u32::try_from(column).unwrap_or(u32::MAX);
        let step = self.column_width.saturating_add(self.gutter);
        self.horizontal_offset
            .saturating_add(self.gutter)
            .saturating_add(column.saturating_mul(step))
    }
}
