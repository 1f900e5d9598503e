//! Renderer sink.
//!
//! Whatever actually draws the grid implements [`Renderer`]. The gallery hands it placed
//! thumbnails and overlay requests; building markup, lazy loading and fetching are all on the
//! renderer's side.

use std::io::Write;

use anyhow::Context;
use serde::Serialize;

use crate::catalog::PhotoRecord;
use crate::image_service::ImageService;
use crate::layout::{DisplayRequest, PlacedItem};

pub trait Renderer {
    /// Removes every thumbnail from the grid.
    fn clear_grid(&mut self) -> anyhow::Result<()>;

    /// Adds one thumbnail to the grid.
    ///
    /// An error drops the thumbnail. The grid layout is not rolled back, the thumbnail's spot
    /// stays empty.
    fn place(&mut self, item: &PlacedItem, photo: &PhotoRecord) -> anyhow::Result<()>;

    fn show_viewer(&mut self, request: &DisplayRequest) -> anyhow::Result<()>;

    fn hide_viewer(&mut self) -> anyhow::Result<()>;
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum Event<'a> {
    Clear,
    Place {
        #[serde(flatten)]
        item: &'a PlacedItem,
        url: String,
    },
    Show {
        #[serde(flatten)]
        request: &'a DisplayRequest,
        url: String,
    },
    Hide,
}

/// Renderer writing one JSON object per event.
#[derive(Debug)]
pub struct JsonLinesRenderer<W, S> {
    out: W,
    service: S,
}

impl<W: Write, S: ImageService> JsonLinesRenderer<W, S> {
    pub fn new(out: W, service: S) -> Self {
        Self { out, service }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &Event<'_>) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, event).context("error serializing event")?;
        writeln!(self.out).context("error writing event")?;
        Ok(())
    }
}

impl<W: Write, S: ImageService> Renderer for JsonLinesRenderer<W, S> {
    fn clear_grid(&mut self) -> anyhow::Result<()> {
        self.emit(&Event::Clear)
    }

    fn place(&mut self, item: &PlacedItem, photo: &PhotoRecord) -> anyhow::Result<()> {
        let url = self.service.resolve(
            &photo.id,
            item.requested_source_width,
            item.requested_source_height,
        );
        self.emit(&Event::Place { item, url })
    }

    fn show_viewer(&mut self, request: &DisplayRequest) -> anyhow::Result<()> {
        let url = self
            .service
            .resolve(&request.photo_id, request.size.w, request.size.h);
        self.emit(&Event::Show { request, url })
    }

    fn hide_viewer(&mut self) -> anyhow::Result<()> {
        self.emit(&Event::Hide)
    }
}
