//! Language type: a validated member of the selector's fixed language set.

use crate::i18n::{LanguageConfig, LanguageRegistry, LanguageStrings};
use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

/// A validated target language.
///
/// Only codes present in the [`LanguageRegistry`] can be turned into a
/// `Language`, so holders never need to re-check membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "ja")
    code: &'static str,
}

impl Language {
    pub const INDONESIAN: Language = Language { code: "id" };
    pub const ENGLISH: Language = Language { code: "en" };
    pub const FRENCH: Language = Language { code: "fr" };
    pub const SPANISH: Language = Language { code: "es" };
    pub const DUTCH: Language = Language { code: "nl" };
    pub const GERMAN: Language = Language { code: "de" };
    pub const JAPANESE: Language = Language { code: "ja" };
    pub const KOREAN: Language = Language { code: "ko" };

    /// Create a Language from a language code string.
    ///
    /// Surrounding whitespace and letter case are ignored, so `" FR "`
    /// parses as French.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is one of the selectable languages
    /// * `Err` otherwise
    pub fn from_code(code: &str) -> Result<Language> {
        let normalized = code.trim().to_ascii_lowercase();

        match LanguageRegistry::get().get_by_code(&normalized) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Every selectable language, in selector order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list_all()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not in the registry. Construction only goes
    /// through `from_code`, the constants, or the registry itself, so this
    /// cannot happen for a well-formed `Language`.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// English name of the language (e.g., "Korean").
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Native name of the language (e.g., "한국어").
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Localized page labels for this language.
    pub fn strings(&self) -> &'static LanguageStrings {
        &self.config().strings
    }
}

impl Default for Language {
    fn default() -> Self {
        Language {
            code: LanguageRegistry::get().default_language().code,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s)
    }
}
