//! Image service contract.
//!
//! The grid never fetches anything itself. It only composes a resource reference from a photo
//! id and the number of source pixels it wants; fetching and decoding is up to the host.

use lightbox_config::UrlTemplate;

pub trait ImageService {
    /// Reference to `photo_id` scaled to `width` by `height` source pixels.
    fn resolve(&self, photo_id: &str, width: u32, height: u32) -> String;
}

/// Image service addressed through URL templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateService {
    url_template: String,
    external_url_template: String,
}

impl TemplateService {
    pub fn new(url_template: &UrlTemplate, external_url_template: &str) -> Self {
        Self {
            url_template: url_template.0.clone(),
            external_url_template: external_url_template.to_owned(),
        }
    }

    pub fn from_config(config: &lightbox_config::ImageService) -> Self {
        Self::new(&config.url_template, &config.external_url_template)
    }

    /// Link to the photo's page on its origin site.
    pub fn external_url(&self, external_ref: &str) -> String {
        self.external_url_template.replace("{ref}", external_ref)
    }
}

impl Default for TemplateService {
    fn default() -> Self {
        Self::from_config(&lightbox_config::ImageService::default())
    }
}

impl ImageService for TemplateService {
    fn resolve(&self, photo_id: &str, width: u32, height: u32) -> String {
        self.url_template
            .replace("{id}", photo_id)
            .replace("{width}", &width.to_string())
            .replace("{height}", &height.to_string())
    }
}
