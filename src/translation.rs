use crate::api::{endpoint_url, ObjectRecord};
use crate::config::Config;
use crate::i18n::{Language, TranslationMetrics, TranslationValidator};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Request body for `POST /api/public/objects/translate`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    text: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    #[serde(default)]
    translated_text: Option<String>,
}

/// Why a field is shown in its original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Nothing to translate; no request was sent
    EmptyInput,
    /// Network error, non-2xx status, or undecodable response
    RequestFailed,
    /// The service answered without a usable `translatedText`
    MissingTranslation,
}

/// Result of best-effort translation of one text.
///
/// Translation never fails the page: a failed call yields `Fallback` with
/// the original text, so callers always get something to display while
/// still being able to tell the two cases apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    Fallback {
        text: String,
        reason: FallbackReason,
    },
}

impl TranslationOutcome {
    /// Text to display, translated or not.
    pub fn text(&self) -> &str {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationOutcome::Translated(_))
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            TranslationOutcome::Translated(_) => None,
            TranslationOutcome::Fallback { reason, .. } => Some(*reason),
        }
    }
}

/// The translatable text fields of an object, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    CategoryName,
    Location,
    Description,
}

impl TextField {
    pub const ALL: [TextField; 4] = [
        TextField::Name,
        TextField::CategoryName,
        TextField::Location,
        TextField::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::CategoryName => "category_name",
            TextField::Location => "location",
            TextField::Description => "description",
        }
    }

    fn get<'a>(&self, record: &'a ObjectRecord) -> &'a str {
        match self {
            TextField::Name => &record.name,
            TextField::CategoryName => &record.category_name,
            TextField::Location => &record.location,
            TextField::Description => &record.description,
        }
    }

    fn set(&self, record: &mut ObjectRecord, value: String) {
        match self {
            TextField::Name => record.name = value,
            TextField::CategoryName => record.category_name = value,
            TextField::Location => record.location = value,
            TextField::Description => record.description = value,
        }
    }
}

/// An object whose four text fields have all been translated (or fallen back).
///
/// Only built once every field outcome is known, so a half-translated record
/// cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedObjectRecord {
    record: ObjectRecord,
    language: Language,
    outcomes: [TranslationOutcome; 4],
}

impl TranslatedObjectRecord {
    /// Assemble from per-field outcomes given in [`TextField::ALL`] order.
    pub fn from_outcomes(
        original: &ObjectRecord,
        language: Language,
        outcomes: [TranslationOutcome; 4],
    ) -> Self {
        let mut record = original.clone();
        for (field, outcome) in TextField::ALL.iter().zip(outcomes.iter()) {
            field.set(&mut record, outcome.text().to_string());
        }
        Self {
            record,
            language,
            outcomes,
        }
    }

    /// The record with translated text substituted.
    pub fn record(&self) -> &ObjectRecord {
        &self.record
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn outcome(&self, field: TextField) -> &TranslationOutcome {
        let index = TextField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default();
        &self.outcomes[index]
    }

    pub fn fallback_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_translated()).count()
    }
}

/// Translate one text into `language`, falling back to the original on any failure.
pub async fn translate_text(
    client: &reqwest::Client,
    config: &Config,
    text: &str,
    language: Language,
) -> TranslationOutcome {
    let metrics = TranslationMetrics::global();

    if text.trim().is_empty() {
        metrics.record_empty_input();
        return TranslationOutcome::Fallback {
            text: text.to_string(),
            reason: FallbackReason::EmptyInput,
        };
    }

    metrics.record_api_call();
    match request_translation(client, config, text, language).await {
        Ok(Some(translated)) => {
            metrics.record_translated();
            TranslationOutcome::Translated(translated)
        }
        Ok(None) => {
            metrics.record_missing_translation();
            debug!(
                "Translation to {} returned no text, keeping original",
                language.code()
            );
            TranslationOutcome::Fallback {
                text: text.to_string(),
                reason: FallbackReason::MissingTranslation,
            }
        }
        Err(e) => {
            metrics.record_api_failure();
            warn!("Translation to {} failed: {:#}", language.code(), e);
            TranslationOutcome::Fallback {
                text: text.to_string(),
                reason: FallbackReason::RequestFailed,
            }
        }
    }
}

async fn request_translation(
    client: &reqwest::Client,
    config: &Config,
    text: &str,
    language: Language,
) -> Result<Option<String>> {
    let url = endpoint_url(&config.api_base_url, &["translate"])?;

    let response = client
        .post(url)
        .json(&TranslateRequest {
            text,
            target_lang: language.code(),
        })
        .send()
        .await
        .context("Failed to send translation request")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
        anyhow::bail!("Translation API error ({}): {}", status, body);
    }

    let parsed: TranslateResponse = response
        .json()
        .await
        .context("Failed to parse translation response")?;

    Ok(parsed.translated_text.filter(|t| !t.is_empty()))
}

/// Translate all four text fields of `record` concurrently.
///
/// Results are reassembled in field order regardless of which call finishes
/// first, so total latency is the slowest single call.
pub async fn translate_record(
    client: &reqwest::Client,
    config: &Config,
    record: &ObjectRecord,
    language: Language,
) -> TranslatedObjectRecord {
    let [name, category_name, location, description] =
        TextField::ALL.map(|field| field.get(record));

    let (name, category_name, location, description) = tokio::join!(
        translate_text(client, config, name, language),
        translate_text(client, config, category_name, language),
        translate_text(client, config, location, language),
        translate_text(client, config, description, language),
    );

    if let TranslationOutcome::Translated(translated) = &description {
        let validation = TranslationValidator::validate(&record.description, translated);
        if validation.has_warnings() {
            warn!(
                "Description translation warnings for object {} ({}): {:?}",
                record.display_id(),
                language.code(),
                validation.warnings
            );
        }
        if validation.has_errors() {
            warn!(
                "Description translation errors for object {} ({}): {:?}",
                record.display_id(),
                language.code(),
                validation.errors
            );
        }
    }

    let translated = TranslatedObjectRecord::from_outcomes(
        record,
        language,
        [name, category_name, location, description],
    );
    debug!(
        "Translated object {} to {} ({} of 4 fields fell back)",
        record.display_id(),
        language.code(),
        translated.fallback_count()
    );
    translated
}
