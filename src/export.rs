//! PDF export of the rendered object detail.
//!
//! Export waits for every gallery image to settle (loaded or failed) and
//! rasterizes the loaded ones at the configured scale. The gallery and the
//! detail block are then laid out on Letter pages with a one-inch margin.

use crate::gallery::Gallery;
use crate::i18n::LanguageStrings;
use crate::page::ObjectPage;
use crate::sanitize::html_to_text;
use crate::translation::TranslatedObjectRecord;
use anyhow::Context;
use chrono::Utc;
use futures::future::join_all;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use reqwest::Url;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

/// Points per inch
const PT_PER_IN: f32 = 72.0;
/// Points per CSS pixel
const PT_PER_PX: f32 = 0.75;
/// Gallery thumbnail size in CSS pixels (16rem x 12rem)
const THUMB_PX: (f32, f32) = (256.0, 192.0);
/// Gap between thumbnails and between blocks (1rem)
const GAP_PT: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    Letter,
    A4,
}

impl PageFormat {
    /// Portrait width and height in points
    fn size(&self) -> (f32, f32) {
        match self {
            PageFormat::Letter => (612.0, 792.0),
            PageFormat::A4 => (595.28, 841.89),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Fixed export settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub margin_inches: f32,
    pub filename: String,
    /// JPEG quality in 0.0..=1.0
    pub image_quality: f32,
    /// Rasterization scale relative to on-screen CSS pixels
    pub scale: f32,
    pub format: PageFormat,
    pub orientation: Orientation,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin_inches: 1.0,
            filename: "object-detail.pdf".to_string(),
            image_quality: 0.98,
            scale: 2.0,
            format: PageFormat::Letter,
            orientation: Orientation::Portrait,
        }
    }
}

impl ExportOptions {
    fn page_size(&self) -> (f32, f32) {
        let (w, h) = self.format.size();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    fn margin(&self) -> f32 {
        self.margin_inches * PT_PER_IN
    }

    fn jpeg_quality(&self) -> u8 {
        (self.image_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the object has not finished loading")]
    NothingToExport,
    #[error("failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// A gallery image after its load attempt finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettledImage {
    Loaded { src: String, bytes: Vec<u8> },
    Errored { src: String, reason: String },
}

impl SettledImage {
    pub fn src(&self) -> &str {
        match self {
            SettledImage::Loaded { src, .. } | SettledImage::Errored { src, .. } => src,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SettledImage::Loaded { .. })
    }
}

/// Load every image concurrently and wait until all of them have settled.
///
/// A failed load never fails the export; it settles as `Errored`. Output
/// order follows `sources`.
pub async fn settle_images(client: &reqwest::Client, sources: &[String]) -> Vec<SettledImage> {
    join_all(sources.iter().map(|src| settle_image(client, src))).await
}

/// Like [`settle_images`], but only requests images served by the API
/// origin. Anything else settles as `Errored` without a request.
async fn settle_gallery(
    client: &reqwest::Client,
    base_url: &str,
    sources: &[String],
) -> Vec<SettledImage> {
    let base = Url::parse(base_url).ok();
    join_all(sources.iter().map(|src| {
        let allowed = base.as_ref().is_some_and(|base| same_origin(base, src));
        async move {
            if allowed {
                settle_image(client, src).await
            } else {
                warn!("Refusing to fetch image {} outside {}", src, base_url);
                SettledImage::Errored {
                    src: src.clone(),
                    reason: "image is not served by the API host".to_string(),
                }
            }
        }
    }))
    .await
}

fn same_origin(base: &Url, src: &str) -> bool {
    Url::parse(src).is_ok_and(|url| {
        url.scheme() == base.scheme()
            && url.host_str() == base.host_str()
            && url.port_or_known_default() == base.port_or_known_default()
    })
}

async fn settle_image(client: &reqwest::Client, src: &str) -> SettledImage {
    match fetch_image(client, src).await {
        Ok(bytes) => SettledImage::Loaded {
            src: src.to_string(),
            bytes,
        },
        Err(e) => {
            warn!("Image {} failed to load: {:#}", src, e);
            SettledImage::Errored {
                src: src.to_string(),
                reason: format!("{:#}", e),
            }
        }
    }
}

async fn fetch_image(client: &reqwest::Client, src: &str) -> anyhow::Result<Vec<u8>> {
    let response = client
        .get(src)
        .send()
        .await
        .context("Failed to request image")?;

    if !response.status().is_success() {
        anyhow::bail!("Image request returned {}", response.status());
    }

    let bytes = response.bytes().await.context("Failed to read image body")?;
    Ok(bytes.to_vec())
}

/// Export the page's current object.
///
/// Fails with [`ExportError::NothingToExport`] while the page is loading.
pub async fn export_page(
    page: &ObjectPage,
    client: &reqwest::Client,
    base_url: &str,
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let Some(object) = page.object() else {
        error!(
            "Export requested for object {} before it finished loading",
            page.object_id()
        );
        return Err(ExportError::NothingToExport);
    };

    let gallery = Gallery::from_record(&object.record().image_url, base_url);
    let settled = settle_gallery(client, base_url, &gallery.sources()).await;
    info!(
        "{} of {} images settled as loaded, rendering PDF",
        settled.iter().filter(|s| s.is_loaded()).count(),
        settled.len()
    );

    render_pdf(object, &settled, object.language().strings(), options)
}

/// Render the PDF for an object whose images have all settled.
///
/// An empty `settled` list means the gallery had no entries, so the
/// localized placeholder is written in its place.
pub fn render_pdf(
    object: &TranslatedObjectRecord,
    settled: &[SettledImage],
    strings: &LanguageStrings,
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let images = prepare_images(settled, options);
    let pages = layout_pages(object, settled.is_empty(), &images, strings, options);
    assemble_document(pages, &images, &object.record().name, options)
}

/// Save the PDF bytes to `path`.
pub fn write_pdf(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path.as_ref(), bytes)?;
    info!("Saved {} ({} bytes)", path.as_ref().display(), bytes.len());
    Ok(())
}

// ==================== Images ====================

/// A gallery image re-encoded as JPEG, ready to embed.
struct PreparedImage {
    resource_name: String,
    jpeg: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

fn prepare_images(settled: &[SettledImage], options: &ExportOptions) -> Vec<PreparedImage> {
    let target_w = (THUMB_PX.0 * options.scale).round().max(1.0) as u32;
    let target_h = (THUMB_PX.1 * options.scale).round().max(1.0) as u32;

    settled
        .iter()
        .filter_map(|image| match image {
            SettledImage::Loaded { src, bytes } => {
                match rasterize(bytes, target_w, target_h, options.jpeg_quality()) {
                    Ok(jpeg) => Some(jpeg),
                    Err(e) => {
                        warn!("Skipping image {} in PDF: {}", src, e);
                        None
                    }
                }
            }
            SettledImage::Errored { src, .. } => {
                warn!("Skipping image {} in PDF: it failed to load", src);
                None
            }
        })
        .enumerate()
        .map(|(index, jpeg)| PreparedImage {
            resource_name: format!("Im{}", index),
            jpeg,
            width_px: target_w,
            height_px: target_h,
        })
        .collect()
}

/// Decode, crop to fill the thumbnail box, and re-encode as JPEG.
fn rasterize(bytes: &[u8], width: u32, height: u32, quality: u8) -> image::ImageResult<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded
        .resize_to_fill(width, height, FilterType::Triangle)
        .to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality).encode_image(&rgb)?;
    Ok(jpeg)
}

// ==================== Layout ====================

const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 15.0;
const TITLE_SIZE: f32 = 22.0;
const TITLE_LEADING: f32 = 28.0;
const META_SIZE: f32 = 12.0;
const META_LEADING: f32 = 17.0;

/// RGB fill color, components in 0.0..=1.0
type Color = (f32, f32, f32);

const TEXT_DARK: Color = (0.12, 0.16, 0.22);
const TEXT_MUTED: Color = (0.42, 0.45, 0.50);

/// Accumulates content operations page by page, top to bottom.
struct PageWriter {
    width: f32,
    height: f32,
    margin: f32,
    cursor_y: f32,
    pages: Vec<Vec<Operation>>,
}

impl PageWriter {
    fn new(options: &ExportOptions) -> Self {
        let (width, height) = options.page_size();
        let margin = options.margin();
        Self {
            width,
            height,
            margin,
            cursor_y: height - margin,
            pages: vec![Vec::new()],
        }
    }

    fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.margin).max(1.0)
    }

    /// Start a new page unless `needed` points still fit on this one.
    fn reserve(&mut self, needed: f32) {
        let at_top = self.cursor_y >= self.height - self.margin;
        if !at_top && self.cursor_y - needed < self.margin {
            self.pages.push(Vec::new());
            self.cursor_y = self.height - self.margin;
        }
    }

    fn current(&mut self) -> &mut Vec<Operation> {
        // `pages` always holds at least one page
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn text_line(&mut self, font: &str, size: f32, leading: f32, color: Color, text: &str) {
        self.reserve(leading);
        let baseline = self.cursor_y - size;
        let x = self.margin;
        self.current().extend([
            Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), size.into()]),
            Operation::new("Td", vec![x.into(), baseline.into()]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
        self.cursor_y -= leading;
    }

    fn paragraph(&mut self, font: &str, size: f32, leading: f32, color: Color, text: &str) {
        let width = self.content_width();
        for line in wrap_text(text, size, width) {
            self.text_line(font, size, leading, color, &line);
        }
    }

    fn gap(&mut self, points: f32) {
        self.cursor_y -= points;
    }

    fn image_grid(&mut self, images: &[PreparedImage]) {
        let cell_w = THUMB_PX.0 * PT_PER_PX;
        let cell_h = THUMB_PX.1 * PT_PER_PX;
        let per_row = ((self.content_width() + GAP_PT) / (cell_w + GAP_PT)).floor();
        let columns = (per_row as usize).max(1);

        for row in images.chunks(columns) {
            self.reserve(cell_h);
            let y = self.cursor_y - cell_h;
            for (column, image) in row.iter().enumerate() {
                let x = self.margin + column as f32 * (cell_w + GAP_PT);
                let resource = image.resource_name.as_str();
                self.current().extend([
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            cell_w.into(),
                            0.into(),
                            0.into(),
                            cell_h.into(),
                            x.into(),
                            y.into(),
                        ],
                    ),
                    Operation::new("Do", vec![resource.into()]),
                    Operation::new("Q", vec![]),
                ]);
            }
            self.cursor_y -= cell_h + GAP_PT;
        }
    }
}

fn layout_pages(
    object: &TranslatedObjectRecord,
    gallery_empty: bool,
    images: &[PreparedImage],
    strings: &LanguageStrings,
    options: &ExportOptions,
) -> Vec<Vec<Operation>> {
    let record = object.record();
    let mut writer = PageWriter::new(options);

    if gallery_empty {
        writer.paragraph("F1", BODY_SIZE, BODY_LEADING, TEXT_MUTED, strings.no_images);
        writer.gap(GAP_PT);
    } else {
        writer.image_grid(images);
    }

    writer.paragraph("F2", TITLE_SIZE, TITLE_LEADING, TEXT_DARK, &record.name);
    writer.paragraph(
        "F1",
        META_SIZE,
        META_LEADING,
        TEXT_DARK,
        &format!("{}: {}", strings.category_label, record.category_name),
    );
    writer.paragraph("F1", META_SIZE, META_LEADING, TEXT_MUTED, &record.location);
    writer.gap(GAP_PT);

    for line in html_to_text(&record.description).lines() {
        if line.is_empty() {
            writer.gap(BODY_LEADING / 2.0);
        } else {
            writer.paragraph("F1", BODY_SIZE, BODY_LEADING, TEXT_DARK, line);
        }
    }

    writer.pages
}

/// Approximate Helvetica advance width, in units of the font size.
fn char_width(c: char) -> f32 {
    match c {
        ' ' => 0.278,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.25,
        'f' | 'r' | 't' | '(' | ')' | '-' => 0.35,
        'm' | 'w' | 'M' | 'W' => 0.85,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_digit() => 0.556,
        _ => 0.53,
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_width).sum::<f32>() * size
}

/// Greedy word wrap; words wider than a line are split by character.
fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if text_width(&candidate, size) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for c in word.chars() {
            if !line.is_empty() && text_width(&line, size) + char_width(c) * size > max_width {
                lines.push(std::mem::take(&mut line));
            }
            line.push(c);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Map text to WinAnsiEncoding bytes for the standard Helvetica fonts.
/// Characters outside that encoding become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

// ==================== Document assembly ====================

fn assemble_document(
    pages: Vec<Vec<Operation>>,
    images: &[PreparedImage],
    title: &str,
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let (width, height) = options.page_size();
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut xobjects = lopdf::Dictionary::new();
    for image in images {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width_px as i64,
                "Height" => image.height_px as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.jpeg.clone(),
        ));
        xobjects.set(image.resource_name.as_str(), image_id);
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
        "XObject" => xobjects,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(title)),
        "Producer" => Object::string_literal("object-viewer"),
        "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
