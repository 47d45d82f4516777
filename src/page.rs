//! View state of the object detail page and its HTML rendering.
//!
//! Each page owns its state (object id, language, selector visibility and the
//! displayed object). Every identifier or language change starts a new
//! [`Cycle`]. Only the latest cycle may commit its result, so a slow response
//! for an old id or language can never overwrite a newer one.

use crate::api::ObjectId;
use crate::gallery::Gallery;
use crate::i18n::Language;
use crate::sanitize::{escape_html, sanitize_html};
use crate::translation::TranslatedObjectRecord;
use reqwest::Url;
use tracing::{debug, info};

/// One fetch + translate round for a given object and language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub id: u64,
    pub object_id: ObjectId,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// A newer cycle started since this one; its result was discarded
    Stale,
}

#[derive(Debug, Clone)]
pub struct ObjectPage {
    object_id: ObjectId,
    language: Language,
    selector_open: bool,
    object: Option<TranslatedObjectRecord>,
    latest_cycle: u64,
}

impl ObjectPage {
    /// A page in the loading state. Call [`ObjectPage::begin_cycle`] to load it.
    pub fn new(object_id: ObjectId, language: Language) -> Self {
        Self {
            object_id,
            language,
            selector_open: false,
            object: None,
            latest_cycle: 0,
        }
    }

    pub fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_selector_open(&self) -> bool {
        self.selector_open
    }

    /// The displayed object, fully translated into [`ObjectPage::language`].
    pub fn object(&self) -> Option<&TranslatedObjectRecord> {
        self.object.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.object.is_none()
    }

    /// Start a new cycle for the current id and language.
    ///
    /// The page returns to loading until the new cycle commits.
    pub fn begin_cycle(&mut self) -> Cycle {
        self.latest_cycle += 1;
        self.object = None;
        debug!(
            "Cycle {} started for object {} ({})",
            self.latest_cycle, self.object_id, self.language
        );
        Cycle {
            id: self.latest_cycle,
            object_id: self.object_id.clone(),
            language: self.language,
        }
    }

    /// Switch to another object. Returns the new cycle, or `None` if the id is unchanged.
    pub fn set_object_id(&mut self, object_id: ObjectId) -> Option<Cycle> {
        if object_id == self.object_id {
            return None;
        }
        self.object_id = object_id;
        Some(self.begin_cycle())
    }

    pub fn open_language_selector(&mut self) {
        self.selector_open = true;
    }

    pub fn close_language_selector(&mut self) {
        self.selector_open = false;
    }

    /// Apply a choice from the selector: switch language, close the selector
    /// and start exactly one new cycle.
    pub fn select_language(&mut self, language: Language) -> Cycle {
        self.language = language;
        self.selector_open = false;
        self.begin_cycle()
    }

    /// Store the result of `cycle` if it is still the latest one.
    pub fn commit(&mut self, cycle: &Cycle, object: TranslatedObjectRecord) -> CommitOutcome {
        if cycle.id != self.latest_cycle {
            info!(
                "Discarding result of cycle {} for object {} ({}); cycle {} is current",
                cycle.id, cycle.object_id, cycle.language, self.latest_cycle
            );
            return CommitOutcome::Stale;
        }

        self.object = Some(object);
        CommitOutcome::Applied
    }

    /// Render the complete page.
    ///
    /// `base_url` is the API base used to resolve gallery image paths.
    pub fn render_html(&self, base_url: &str) -> String {
        let strings = self.language.strings();
        let title = self
            .object
            .as_ref()
            .map(|o| o.record().name.as_str())
            .unwrap_or(strings.loading);

        let mut html = format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"container\">\n",
            self.language.code(),
            escape_html(title),
            PAGE_STYLE
        );

        html.push_str(&format!(
            "<nav class=\"navbar\"><div class=\"logo\">Logo</div>\
             <a class=\"language-button\" href=\"?lang={}&amp;selector=open\" aria-label=\"{}\">{}</a></nav>\n",
            self.language.code(),
            escape_html(strings.change_language),
            self.language.code().to_uppercase()
        ));

        if self.selector_open {
            html.push_str(&self.render_language_selector());
        }

        match &self.object {
            None => {
                html.push_str(&format!(
                    "<p class=\"loading\">{}</p>\n",
                    escape_html(strings.loading)
                ));
            }
            Some(object) => {
                let record = object.record();
                let gallery = Gallery::from_record(&record.image_url, base_url);

                html.push_str("<div id=\"export-content\">\n");
                html.push_str(&gallery.render_html(strings));
                html.push_str(&format!(
                    "\n<div class=\"object-detail-wrapper\">\n<h1>{}</h1>\n\
                     <p class=\"category\">{}: {}</p>\n<p class=\"location\">{}</p>\n\
                     <div id=\"object-description\" class=\"desc-wrapper\">{}</div>\n</div>\n</div>\n",
                    escape_html(&record.name),
                    escape_html(strings.category_label),
                    escape_html(&record.category_name),
                    escape_html(&record.location),
                    sanitize_html(&record.description)
                ));
                html.push_str(&format!(
                    "<a class=\"export-button\" href=\"{}\" download=\"object-detail.pdf\">{}</a>\n",
                    escape_html(&export_href(&self.object_id, self.language)),
                    escape_html(strings.export_pdf)
                ));
            }
        }

        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    fn render_language_selector(&self) -> String {
        let strings = self.language.strings();
        let mut html = format!(
            "<div class=\"language-modal\" role=\"dialog\"><div class=\"language-modal-body\">\
             <h2>{}</h2><div class=\"language-options\">",
            escape_html(strings.choose_language)
        );
        for language in Language::all() {
            let class = if language == self.language {
                "language-option selected"
            } else {
                "language-option"
            };
            html.push_str(&format!(
                "<a class=\"{}\" href=\"?lang={}\" title=\"{}\">{}</a>",
                class,
                language.code(),
                escape_html(language.native_name()),
                language.code().to_uppercase()
            ));
        }
        html.push_str("</div></div></div>\n");
        html
    }
}

/// Path of the PDF export for an object, with the id percent-encoded.
fn export_href(object_id: &ObjectId, language: Language) -> String {
    let id = object_id.to_string();
    let path = Url::parse("http://localhost/")
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut()
                .ok()?
                .clear()
                .extend(["objects", id.as_str(), "export.pdf"]);
            Some(url.path().to_string())
        })
        .unwrap_or_else(|| format!("/objects/{}/export.pdf", id));
    format!("{}?lang={}", path, language.code())
}

const PAGE_STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;color:#1f2937}\
.container{max-width:64rem;margin:0 auto;padding:1.25rem}\
.navbar{display:flex;justify-content:space-between;align-items:center;padding:1rem 0;border-bottom:1px solid #e5e7eb}\
.logo{font-size:1.5rem;font-weight:700}\
.language-button{padding:.5rem .75rem;border:1px solid #d1d5db;border-radius:9999px;text-decoration:none;color:inherit}\
.language-modal{position:fixed;inset:0;background:rgba(55,65,81,.5);display:flex;justify-content:center;align-items:center;z-index:50}\
.language-modal-body{background:#fff;padding:1.25rem;border-radius:.5rem;width:100%;max-width:24rem}\
.language-options{display:flex;flex-direction:column;gap:1rem}\
.language-option{padding:.5rem;border:1px solid #d1d5db;border-radius:.25rem;background:#f3f4f6;text-decoration:none;color:inherit}\
.language-option.selected{background:#3b82f6;color:#fff}\
.gallery{display:flex;overflow-x:auto;gap:1rem;padding:1rem 0;margin-bottom:1rem}\
.gallery-image{width:16rem;height:12rem;object-fit:cover;border-radius:.375rem;flex:none}\
.gallery-empty{color:#6b7280}\
h1{font-size:1.875rem;margin:0 0 .5rem}\
.category{color:#374151}\
.location{color:#6b7280}\
.export-button{display:inline-block;margin-top:1rem;padding:.5rem;background:#3b82f6;color:#fff;border-radius:.25rem;text-decoration:none}";
