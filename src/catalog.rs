//! Photo catalog.
//!
//! The catalog is the read-only input of the grid: an ordered list of photos with their true
//! source dimensions. Display order is catalog order, and a photo's position in the catalog
//! is its [`Handle`], which identifies it across pagination and selection events.

use std::fmt;
use std::path::Path;

use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::types::Size;

/// Position of a photo in the unpaginated catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(pub usize);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    /// Native size of the source image. Both sides are non-zero.
    pub size: Size,
    /// Identifier understood by the image service.
    pub id: String,
    /// Index into the catalog's author table.
    pub author: usize,
    /// Identifier of the photo on its origin site.
    pub external_ref: String,
    pub handle: Handle,
}

/// Maps author indices to display names.
pub trait AuthorLookup {
    fn author_name(&self, index: usize) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    photos: Vec<PhotoRecord>,
    authors: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    authors: Vec<String>,
    photos: Vec<PhotoEntry>,
}

/// A photo as written in a catalog file.
///
/// Accepts both the compact `[width, height, id, author, ref]` form and an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoEntry {
    pub width: u32,
    pub height: u32,
    pub id: PhotoId,
    pub author: usize,
    pub external_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PhotoId {
    Text(String),
    Number(u64),
}

impl From<PhotoId> for String {
    fn from(id: PhotoId) -> Self {
        match id {
            PhotoId::Text(text) => text,
            PhotoId::Number(number) => number.to_string(),
        }
    }
}

impl Catalog {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let _span = tracy_client::span!("Catalog::load");

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("error reading catalog {path:?}"))?;
        let catalog =
            Self::from_json(&text).with_context(|| format!("error loading catalog {path:?}"))?;

        debug!(
            "loaded {} photos by {} authors from {path:?}",
            catalog.len(),
            catalog.authors.len()
        );
        Ok(catalog)
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = serde_json::from_str(text).context("error parsing catalog")?;
        Self::new(file.authors, file.photos)
    }

    /// Builds a catalog, rejecting photos that can't be laid out.
    pub fn new(authors: Vec<String>, entries: Vec<PhotoEntry>) -> anyhow::Result<Self> {
        let mut photos = Vec::with_capacity(entries.len());

        for (idx, entry) in entries.into_iter().enumerate() {
            let id = String::from(entry.id);

            if entry.width == 0 || entry.height == 0 {
                bail!(
                    "photo {id} (row {idx}) has zero size {}x{}",
                    entry.width,
                    entry.height
                );
            }
            ensure!(
                entry.author < authors.len(),
                "photo {id} (row {idx}) refers to author {} but there are only {} authors",
                entry.author,
                authors.len()
            );

            photos.push(PhotoRecord {
                size: Size::new(entry.width, entry.height),
                id,
                author: entry.author,
                external_ref: entry.external_ref,
                handle: Handle(idx),
            });
        }

        Ok(Self { photos, authors })
    }

    /// Keeps only the first `limit` photos. A limit of 0 keeps everything.
    pub fn truncated(mut self, limit: usize) -> Self {
        if limit > 0 && limit < self.photos.len() {
            debug!("truncating catalog from {} to {limit} photos", self.photos.len());
            self.photos.truncate(limit);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, handle: Handle) -> Option<&PhotoRecord> {
        self.photos.get(handle.0)
    }

    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

impl AuthorLookup for Catalog {
    fn author_name(&self, index: usize) -> Option<&str> {
        self.authors.get(index).map(String::as_str)
    }
}

#[cfg(test)]
impl Catalog {
    /// Catalog of anonymous photos with the given native sizes.
    pub fn from_sizes(sizes: &[(u32, u32)]) -> Self {
        let entries = sizes
            .iter()
            .enumerate()
            .map(|(idx, &(width, height))| PhotoEntry {
                width,
                height,
                id: PhotoId::Number(idx as u64),
                author: 0,
                external_ref: format!("ref-{idx}"),
            })
            .collect();
        Self::new(vec![String::from("Anonymous")], entries).unwrap()
    }
}
