//! Resize event coalescing.
//!
//! Hosts fire resize events at a high rate while a window is being dragged. Re-laying out the
//! grid on each of them is wasted work, so resizes go through a trailing-edge debouncer: only
//! the last geometry is applied, once the window has been still for the delay.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::layout::ViewportGeometry;

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<Pending>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    geometry: ViewportGeometry,
    deadline: Instant,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Records a resize, pushing the deadline back.
    pub fn push(&mut self, geometry: ViewportGeometry, now: Instant) {
        if self.pending.is_some() {
            trace!("coalescing resize to {}x{}", geometry.width, geometry.height);
        }

        self.pending = Some(Pending {
            geometry,
            deadline: now + self.delay,
        });
    }

    /// Returns the latest geometry once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<ViewportGeometry> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }

        self.pending = None;
        Some(pending.geometry)
    }

    /// When [`Self::poll`] will next return a geometry.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
