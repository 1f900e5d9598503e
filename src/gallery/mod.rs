//! Event handling for one thumbnail grid.
//!
//! A [`Gallery`] owns all mutable grid state: the column plan, the running column heights, the
//! page cursor and the photo open in the overlay, if any. Hosts feed it events (load, resize,
//! scroll, select, close) and it pushes the results into a [`Renderer`].
//!
//! Every event is handled synchronously and completely before the next one, so there's no
//! locking. In particular, fetching the next page and placing it is a single step: a duplicate
//! scroll event can't advance the cursor twice for one page. Resize events must already be
//! coalesced, see [`crate::utils::debounce::ResizeDebouncer`].

use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::catalog::{Catalog, Handle};
use crate::layout::{
    ColumnPlan, DisplayRequest, MasonryLayout, Options, Paginator, ViewerSummary,
    ViewportGeometry,
};
use crate::renderer::Renderer;

#[cfg(test)]
mod tests;

/// Scroll state of the container holding the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Total height of the scrolled content.
    pub scroll_height: f64,
    /// Distance scrolled from the top.
    pub scroll_top: f64,
    /// Height of the visible part.
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Distance left to scroll before hitting the bottom.
    pub fn remaining(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

#[derive(Debug)]
pub struct Gallery {
    catalog: Rc<Catalog>,
    options: Rc<Options>,
    geometry: ViewportGeometry,
    pager: Paginator,
    masonry: MasonryLayout,
    /// Photo shown in the overlay.
    open: Option<Handle>,
}

impl Gallery {
    pub fn new(catalog: Rc<Catalog>, options: Rc<Options>, geometry: ViewportGeometry) -> Self {
        let plan = options.column_plan(geometry.width);
        let page_len = options.page_len(&plan, geometry.height, catalog.len());

        debug!(
            "{} photos in {} columns of {}px, {page_len} per page",
            catalog.len(),
            plan.column_count,
            plan.column_width
        );

        Self {
            pager: Paginator::new(catalog.len(), page_len),
            masonry: MasonryLayout::new(plan, geometry.scale),
            catalog,
            options,
            geometry,
            open: None,
        }
    }

    /// Places the first page.
    pub fn load(&mut self, renderer: &mut impl Renderer) -> usize {
        self.advance(renderer)
    }

    /// Places the next page, if any. Returns the number of thumbnails placed.
    pub fn advance(&mut self, renderer: &mut impl Renderer) -> usize {
        let _span = tracy_client::span!("Gallery::advance");

        let start = Instant::now();
        let handles = self.pager.next_page();
        if handles.is_empty() {
            return 0;
        }

        let items = self.masonry.place_page(&self.catalog, &handles);
        for item in &items {
            let Some(photo) = self.catalog.get(item.handle) else {
                continue;
            };

            if let Err(err) = renderer.place(item, photo) {
                warn!("error placing thumbnail {}: {err:?}", item.handle);
            }
        }

        let elapsed = start.elapsed();
        debug!(
            "placed {} thumbnails in {elapsed:?} (~{:.0} thumbnails/s)",
            items.len(),
            items.len() as f64 / elapsed.as_secs_f64().max(1e-6)
        );

        items.len()
    }

    /// Handles a scroll of the grid container.
    ///
    /// Places the next page when the container is scrolled to within the scroll epsilon of its
    /// bottom edge.
    pub fn scroll(&mut self, metrics: ScrollMetrics, renderer: &mut impl Renderer) -> usize {
        if self.pager.is_exhausted() {
            return 0;
        }

        if metrics.remaining() >= self.options.scroll_epsilon {
            return 0;
        }

        self.advance(renderer)
    }

    /// Applies a new (coalesced) viewport geometry.
    ///
    /// A width or pixel ratio change discards the whole grid and lays it out again from the
    /// first page. The open overlay, if any, is refit to the new viewport on any change.
    /// Returns whether the grid was laid out again.
    pub fn resize(&mut self, geometry: ViewportGeometry, renderer: &mut impl Renderer) -> bool {
        let _span = tracy_client::span!("Gallery::resize");

        let old = self.geometry;
        if old == geometry {
            return false;
        }
        self.geometry = geometry;

        let relayout = old.width != geometry.width || old.scale != geometry.scale;
        if relayout {
            let plan = self.options.column_plan(geometry.width);
            let page_len = self
                .options
                .page_len(&plan, geometry.height, self.catalog.len());
            debug!(
                "viewport width changed from {} to {}: {} columns of {}px, {page_len} per page",
                old.width, geometry.width, plan.column_count, plan.column_width
            );

            self.masonry.reset(plan, geometry.scale);
            self.pager.set_page_len(page_len);

            if let Err(err) = renderer.clear_grid() {
                warn!("error clearing grid: {err:?}");
            }
            self.advance(renderer);
        }

        if let Some(handle) = self.open {
            self.show(handle, renderer);
        }

        relayout
    }

    /// Opens a photo in the overlay.
    pub fn select(
        &mut self,
        handle: Handle,
        renderer: &mut impl Renderer,
    ) -> Option<DisplayRequest> {
        let request = self.show(handle, renderer)?;
        self.open = Some(handle);
        Some(request)
    }

    fn show(&mut self, handle: Handle, renderer: &mut impl Renderer) -> Option<DisplayRequest> {
        let Some(photo) = self.catalog.get(handle) else {
            warn!("tried to open unknown photo {handle}");
            return None;
        };

        let request = self.options.viewer.display_request(photo, &self.geometry);
        debug!(
            "opening {handle} at {}x{} ({})",
            request.size.w, request.size.h, request.density
        );

        if let Err(err) = renderer.show_viewer(&request) {
            warn!("error showing photo {handle}: {err:?}");
        }

        Some(request)
    }

    pub fn close_viewer(&mut self, renderer: &mut impl Renderer) {
        if self.open.take().is_none() {
            return;
        }

        if let Err(err) = renderer.hide_viewer() {
            warn!("error hiding viewer: {err:?}");
        }
    }

    /// Info panel contents for the open photo.
    pub fn summary(&self) -> Option<ViewerSummary> {
        let photo = self.catalog.get(self.open?)?;
        Some(
            self.options
                .viewer
                .summary(photo, &self.geometry, &*self.catalog),
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    pub fn plan(&self) -> &ColumnPlan {
        self.masonry.plan()
    }

    pub fn column_heights(&self) -> &[u32] {
        self.masonry.column_heights()
    }

    /// Height of the grid content, for sizing the scroll container.
    pub fn content_height(&self) -> u32 {
        self.masonry.content_height()
    }

    pub fn pager(&self) -> &Paginator {
        &self.pager
    }

    pub fn open_photo(&self) -> Option<Handle> {
        self.open
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        self.masonry.verify_invariants();

        let plan = self.plan();
        assert_eq!(
            *plan,
            self.options.column_plan(self.geometry.width),
            "plan must match the viewport width"
        );
        assert_eq!(self.masonry.scale(), self.geometry.scale);

        let gallery_width = plan.gallery_width();
        if self.geometry.width >= 2 * plan.gutter + 1 {
            assert!(
                gallery_width <= self.geometry.width,
                "grid must fit the viewport (gallery width {gallery_width} > viewport width {})",
                self.geometry.width
            );
            assert_eq!(
                plan.horizontal_offset,
                (self.geometry.width - gallery_width) / 2,
                "grid must be centered"
            );
        }

        if self.catalog.is_empty() {
            assert!(self.pager.is_exhausted());
        } else {
            assert!(self.pager.page_len() >= 1);
            assert_eq!(
                self.pager.total_pages(),
                self.catalog.len().div_ceil(self.pager.page_len())
            );
        }

        if let Some(handle) = self.open {
            assert!(
                self.catalog.get(handle).is_some(),
                "open photo must be in the catalog"
            );
        }
    }
}
