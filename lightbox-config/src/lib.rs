//! Configuration for the lightbox photo grid.
//!
//! The config is a KDL document decoded with knuffel. Every section is optional; missing
//! sections and options fall back to the values in `resources/default-config.kdl`.

use std::ffi::OsStr;
use std::path::Path;

use miette::{Context, IntoDiagnostic};
use tracing::debug;

pub mod gallery;
pub mod service;

pub use crate::gallery::{Gallery, ResponsiveColumns};
pub use crate::service::{Debounce, ImageService, UrlTemplate};

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub gallery: Gallery,
    #[knuffel(child, default)]
    pub viewer: Viewer,
    #[knuffel(child, default)]
    pub image_service: ImageService,
    #[knuffel(child, default)]
    pub debounce: Debounce,
}

/// Overlay viewer settings.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// Portrait renders shorter than this are classified as standard definition.
    #[knuffel(child, unwrap(argument), default = Self::default().sd_height)]
    pub sd_height: u32,
    /// Landscape renders narrower than this are classified as standard definition.
    #[knuffel(child, unwrap(argument), default = Self::default().sd_width)]
    pub sd_width: u32,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            sd_height: 720,
            sd_width: 1280,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let config = Self::parse(
            path.file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("config.kdl"),
            &contents,
        )
        .context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse(
            "default-config.kdl",
            include_str!("../../resources/default-config.kdl"),
        )
        .unwrap()
    }
}
