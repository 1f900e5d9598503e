//! Masonry placement.
//!
//! Photos go one by one into the currently shortest column, which keeps the bottom edge of
//! the grid roughly even no matter the aspect ratios. Placement order is part of the visual
//! result: the same handles in the same order always land in the same spots.

use serde::Serialize;
use tracing::{trace, warn};

use super::density::{self, DensityMode};
use super::geometry::ColumnPlan;
use super::types::{Axis, DevicePixelRatio, Size};
use crate::catalog::{Catalog, Handle, PhotoRecord};

/// A thumbnail positioned in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacedItem {
    pub handle: Handle,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Source pixels to request from the image service.
    pub requested_source_width: u32,
    pub requested_source_height: u32,
}

impl PlacedItem {
    pub fn requested_size(&self) -> Size {
        Size::new(self.requested_source_width, self.requested_source_height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasonryLayout {
    plan: ColumnPlan,
    scale: DevicePixelRatio,
    /// Running height of every column. Has `plan.column_count` elements.
    heights: Vec<u32>,
}

impl MasonryLayout {
    pub fn new(plan: ColumnPlan, scale: DevicePixelRatio) -> Self {
        Self {
            plan,
            scale,
            heights: vec![plan.gutter; plan.column_count as usize],
        }
    }

    /// Switches to a new plan, dropping everything placed so far.
    pub fn reset(&mut self, plan: ColumnPlan, scale: DevicePixelRatio) {
        *self = Self::new(plan, scale);
    }

    /// Drops everything placed so far, keeping the plan.
    pub fn clear(&mut self) {
        self.heights.clear();
        self.heights
            .resize(self.plan.column_count as usize, self.plan.gutter);
    }

    pub fn plan(&self) -> &ColumnPlan {
        &self.plan
    }

    pub fn scale(&self) -> DevicePixelRatio {
        self.scale
    }

    pub fn column_heights(&self) -> &[u32] {
        &self.heights
    }

    /// Index of the shortest column, the leftmost one on ties.
    pub fn shortest_column(&self) -> usize {
        let mut idx = 0;
        let mut best = self.heights[0];
        for (i, &height) in self.heights.iter().enumerate().skip(1) {
            if height < best {
                best = height;
                idx = i;
            }
        }
        idx
    }

    /// Height of the tallest column, including the bottom gutter.
    pub fn content_height(&self) -> u32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    /// Places one photo into the shortest column.
    pub fn place(&mut self, photo: &PhotoRecord) -> PlacedItem {
        let column = self.shortest_column();
        let native = photo.size;
        let width = self.plan.column_width;

        let height = native.height_for_width(width);
        let requested_width =
            density::resolve(DensityMode::ConstantSize, native, Axis::Width, width, self.scale);
        // Derived from the resolved width rather than resolved on its own so that both axes
        // keep the exact aspect ratio.
        let requested_height = native.height_for_width(requested_width);

        let item = PlacedItem {
            handle: photo.handle,
            x: self.plan.column_x(column),
            y: self.heights[column],
            width,
            height,
            requested_source_width: requested_width,
            requested_source_height: requested_height,
        };
        trace!("placed {} in column {column}: {item:?}", photo.handle);

        let bottom = &mut self.heights[column];
        *bottom = bottom.saturating_add(height).saturating_add(self.plan.gutter);
        item
    }

    /// Places a page of photos in order.
    ///
    /// Handles missing from the catalog are skipped.
    pub fn place_page(&mut self, catalog: &Catalog, handles: &[Handle]) -> Vec<PlacedItem> {
        let _span = tracy_client::span!("MasonryLayout::place_page");

        let mut items = Vec::with_capacity(handles.len());
        for &handle in handles {
            let Some(photo) = catalog.get(handle) else {
                warn!("tried to place unknown photo {handle}");
                continue;
            };
            items.push(self.place(photo));
        }
        items
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        assert!(self.plan.column_count >= 1);
        assert!(self.plan.column_width >= 1);
        assert_eq!(self.heights.len(), self.plan.column_count as usize);
        for &height in &self.heights {
            assert!(height >= self.plan.gutter, "columns can't be shorter than the gutter");
        }
    }
}
