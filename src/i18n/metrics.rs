//! Translation metrics and observability module.
//!
//! Field translation is best-effort: a failed call silently falls back to the
//! original text. These counters make that fallback visible.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global translation metrics singleton.
pub struct TranslationMetrics {
    /// Requests sent to the translate endpoint
    api_calls: AtomicUsize,

    /// Requests that errored (network, non-2xx status, undecodable body)
    api_failures: AtomicUsize,

    /// Successful responses without a usable `translatedText`
    missing_translations: AtomicUsize,

    /// Fields that were empty and never sent
    empty_inputs: AtomicUsize,

    /// Fields displayed with translated text
    translated: AtomicUsize,
}

static METRICS: OnceLock<TranslationMetrics> = OnceLock::new();

impl TranslationMetrics {
    /// Get the global translation metrics instance.
    pub fn global() -> &'static TranslationMetrics {
        METRICS.get_or_init(|| TranslationMetrics {
            api_calls: AtomicUsize::new(0),
            api_failures: AtomicUsize::new(0),
            missing_translations: AtomicUsize::new(0),
            empty_inputs: AtomicUsize::new(0),
            translated: AtomicUsize::new(0),
        })
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing_translation(&self) {
        self.missing_translations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_input(&self) {
        self.empty_inputs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translated(&self) {
        self.translated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    pub fn missing_translations(&self) -> usize {
        self.missing_translations.load(Ordering::Relaxed)
    }

    pub fn empty_inputs(&self) -> usize {
        self.empty_inputs.load(Ordering::Relaxed)
    }

    pub fn translated(&self) -> usize {
        self.translated.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let translated = self.translated();
        let api_failures = self.api_failures();
        let missing_translations = self.missing_translations();
        let empty_inputs = self.empty_inputs();
        let fallbacks = api_failures + missing_translations + empty_inputs;

        let total_fields = translated + fallbacks;
        let translated_rate = if total_fields > 0 {
            (translated as f64 / total_fields as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            api_calls: self.api_calls(),
            api_failures,
            missing_translations,
            empty_inputs,
            translated,
            fallbacks,
            translated_rate,
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.api_calls.store(0, Ordering::Relaxed);
        self.api_failures.store(0, Ordering::Relaxed);
        self.missing_translations.store(0, Ordering::Relaxed);
        self.empty_inputs.store(0, Ordering::Relaxed);
        self.translated.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the translation counters, served by `GET /metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub api_calls: usize,
    pub api_failures: usize,
    pub missing_translations: usize,
    pub empty_inputs: usize,
    pub translated: usize,

    /// Sum of every fallback kind
    pub fallbacks: usize,

    /// Share of fields shown translated, as a percentage (0-100)
    pub translated_rate: f64,
}
