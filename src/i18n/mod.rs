//! Internationalization (i18n) module for the object detail page.
//!
//! Everything language-related lives here: the closed set of target
//! languages, the localized page chrome, and translation bookkeeping.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the selectable languages and their metadata
//! - `language`: Validated `Language` handle used everywhere else in the crate
//! - `strings`: Localized page labels (loading text, category label, selector heading, ...)
//! - `validator`: Structural checks on translated HTML descriptions
//! - `metrics`: Counters for translated vs. fallback outcomes
//!
//! # Example
//!
//! ```rust,ignore
//! use object_viewer::i18n::{Language, LanguageRegistry};
//!
//! let default = Language::default();
//! let japanese = Language::from_code("ja")?;
//! let selectable = LanguageRegistry::get().list_all();
//! ```

mod language;
mod metrics;
mod registry;
mod strings;
mod validator;

pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
pub use validator::{TranslationValidator, ValidationReport};
