use crate::i18n::Language;
use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Object API
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub fetch_max_attempts: u32,

    // Page
    pub default_language: Language,

    // Server
    pub port: u16,

    // Export
    pub pdf_output_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_language = match std::env::var("DEFAULT_LANGUAGE") {
            Ok(code) => Language::from_code(&code).context("DEFAULT_LANGUAGE is invalid")?,
            Err(_) => Language::default(),
        };

        Ok(Self {
            // Object API
            api_base_url: normalize_base_url(
                &std::env::var("OBJECT_API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:9977".to_string()),
            ),
            http_timeout: Duration::from_secs(
                std::env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            fetch_max_attempts: std::env::var("FETCH_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(1)
                .max(1),

            // Page
            default_language,

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),

            // Export
            pdf_output_path: std::env::var("PDF_OUTPUT_PATH")
                .unwrap_or_else(|_| "object-detail.pdf".to_string()),
        })
    }

    /// Build the shared HTTP client used for the API and gallery images.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .context("Failed to build HTTP client")
    }
}

/// Strip trailing slashes so paths can be appended verbatim.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
