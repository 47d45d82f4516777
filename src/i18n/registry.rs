//! Language registry: the closed set of languages offered by the selector.
//!
//! The registry is a lazily initialised singleton (`OnceLock`). Its order is
//! the order in which the language selector lists the codes.

use crate::i18n::strings::{
    DUTCH_STRINGS, ENGLISH_STRINGS, FRENCH_STRINGS, GERMAN_STRINGS, INDONESIAN_STRINGS,
    JAPANESE_STRINGS, KOREAN_STRINGS, SPANISH_STRINGS,
};
use crate::i18n::LanguageStrings;
use std::sync::OnceLock;

/// Configuration for a selectable target language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "id")
    pub code: &'static str,

    /// English name of the language (e.g., "Indonesian")
    pub name: &'static str,

    /// Native name of the language (e.g., "Bahasa Indonesia")
    pub native_name: &'static str,

    /// Whether this is the language a fresh page starts in (exactly one)
    pub is_default: bool,

    /// Localized page labels
    pub strings: LanguageStrings,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its exact code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All languages, in selector order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// The language a page starts in when none was chosen.
    ///
    /// # Panics
    /// Panics if the built-in table does not have exactly one default
    /// language (a programming error, covered by tests).
    pub fn default_language(&self) -> &LanguageConfig {
        let defaults: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default language found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default languages found in registry"),
        }
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// The fixed selector set: id, en, fr, es, nl, de, ja, ko.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "id",
            name: "Indonesian",
            native_name: "Bahasa Indonesia",
            is_default: false,
            strings: INDONESIAN_STRINGS,
        },
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_default: true,
            strings: ENGLISH_STRINGS,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            is_default: false,
            strings: FRENCH_STRINGS,
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            is_default: false,
            strings: SPANISH_STRINGS,
        },
        LanguageConfig {
            code: "nl",
            name: "Dutch",
            native_name: "Nederlands",
            is_default: false,
            strings: DUTCH_STRINGS,
        },
        LanguageConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
            is_default: false,
            strings: GERMAN_STRINGS,
        },
        LanguageConfig {
            code: "ja",
            name: "Japanese",
            native_name: "日本語",
            is_default: false,
            strings: JAPANESE_STRINGS,
        },
        LanguageConfig {
            code: "ko",
            name: "Korean",
            native_name: "한국어",
            is_default: false,
            strings: KOREAN_STRINGS,
        },
    ]
}
