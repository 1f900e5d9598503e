//! Overlay viewer sizing.
//!
//! The overlay shows one photo fit to the viewport along its long axis. Only the long axis is
//! resolved for density, the other one is derived from it so the displayed image always has
//! exactly the aspect ratio of the source.

use std::fmt;

use serde::Serialize;

use super::density::{self, DensityMode};
use super::types::{Axis, Size, ViewportGeometry};
use crate::catalog::{AuthorLookup, Handle, PhotoRecord};

/// Rough quality class of an overlay render, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DensityClass {
    #[serde(rename = "SD")]
    Sd,
    #[serde(rename = "HD")]
    Hd,
    /// More source pixels than logical viewport pixels.
    #[serde(rename = "SuperHD")]
    SuperHd,
}

impl fmt::Display for DensityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sd => "SD",
            Self::Hd => "HD",
            Self::SuperHd => "SuperHD",
        })
    }
}

/// Request to show one photo in the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRequest {
    pub handle: Handle,
    pub photo_id: String,
    /// Source pixels to request from the image service.
    pub size: Size,
    pub density: DensityClass,
}

/// Informational panel contents for the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerSummary {
    pub photo_id: String,
    pub author: Option<String>,
    pub external_ref: String,
    pub native: Size,
    pub window: Size,
    pub render: Size,
    pub density: DensityClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Portrait renders shorter than this are [`DensityClass::Sd`].
    pub sd_height: u32,
    /// Landscape renders narrower than this are [`DensityClass::Sd`].
    pub sd_width: u32,
}

impl ViewerOptions {
    pub fn from_config(config: &lightbox_config::Viewer) -> Self {
        Self {
            sd_height: config.sd_height,
            sd_width: config.sd_width,
        }
    }
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self::from_config(&lightbox_config::Viewer::default())
    }
}

impl ViewerOptions {
    /// Sizes `photo` to fit the viewport.
    pub fn display_request(
        &self,
        photo: &PhotoRecord,
        geometry: &ViewportGeometry,
    ) -> DisplayRequest {
        let native = photo.size;
        let mode = DensityMode::ConstantDensity;

        let (size, density) = if native.is_portrait() {
            let h = density::resolve(mode, native, Axis::Height, geometry.height, geometry.scale);
            let w = native.width_for_height(h);
            (Size::new(w, h), self.classify(h, geometry.height, self.sd_height))
        } else {
            let w = density::resolve(mode, native, Axis::Width, geometry.width, geometry.scale);
            let h = native.height_for_width(w);
            (Size::new(w, h), self.classify(w, geometry.width, self.sd_width))
        };

        DisplayRequest {
            handle: photo.handle,
            photo_id: photo.id.clone(),
            size,
            density,
        }
    }

    pub fn summary(
        &self,
        photo: &PhotoRecord,
        geometry: &ViewportGeometry,
        authors: &impl AuthorLookup,
    ) -> ViewerSummary {
        let request = self.display_request(photo, geometry);
        ViewerSummary {
            photo_id: request.photo_id,
            author: authors.author_name(photo.author).map(String::from),
            external_ref: photo.external_ref.clone(),
            native: photo.size,
            window: geometry.size(),
            render: request.size,
            density: request.density,
        }
    }

    fn classify(&self, rendered: u32, viewport: u32, sd_threshold: u32) -> DensityClass {
        if rendered > viewport {
            DensityClass::SuperHd
        } else if rendered < sd_threshold {
            DensityClass::Sd
        } else {
            DensityClass::Hd
        }
    }
}
