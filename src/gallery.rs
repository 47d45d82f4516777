//! Image gallery: parses an object's `image_url` list and renders the strip.

use crate::i18n::LanguageStrings;
use crate::sanitize::escape_html;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("image list is not a JSON array of strings: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse the JSON-encoded list of image paths.
///
/// Empty or whitespace-only input means "no images".
pub fn parse_image_list(raw: &str) -> Result<Vec<String>, GalleryError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str::<Vec<String>>(raw)?)
}

/// One image of the gallery, ready to render or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    pub images: Vec<GalleryImage>,
}

impl Gallery {
    /// Build the gallery for a record's raw `image_url` value.
    ///
    /// A malformed list is logged and treated as empty so the rest of the
    /// page still renders.
    pub fn from_record(raw: &str, base_url: &str) -> Self {
        match parse_image_list(raw) {
            Ok(paths) => Self::from_paths(&paths, base_url),
            Err(e) => {
                warn!("Ignoring malformed image list {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    pub fn from_paths(paths: &[String], base_url: &str) -> Self {
        let images = paths
            .iter()
            .enumerate()
            .map(|(index, path)| GalleryImage {
                src: image_src(base_url, path),
                alt: format!("Image {}", index + 1),
            })
            .collect();
        Self { images }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image sources in display order.
    pub fn sources(&self) -> Vec<String> {
        self.images.iter().map(|image| image.src.clone()).collect()
    }

    /// Render the horizontal strip, or the localized placeholder when empty.
    pub fn render_html(&self, strings: &LanguageStrings) -> String {
        if self.images.is_empty() {
            return format!(
                "<p class=\"gallery-empty\">{}</p>",
                escape_html(strings.no_images)
            );
        }

        let mut html = String::from("<div id=\"image-gallery\" class=\"gallery\">");
        for image in &self.images {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" class=\"gallery-image\" crossorigin=\"anonymous\">",
                escape_html(&image.src),
                escape_html(&image.alt)
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// Stored paths are always served by the API, so the base URL is always prefixed.
fn image_src(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url, path)
}
