//! Translation quality validation module.
//!
//! Descriptions are HTML. A translation service that rewrites markup can
//! silently break the detail view, so translated descriptions are checked
//! for preserved tags and link targets before they are shown.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical errors that indicate translation issues
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translated HTML fragments.
pub struct TranslationValidator;

static OPEN_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static LINK_ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
static SCRIPT_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate that a translated HTML fragment keeps the original's structure.
    ///
    /// Checks that:
    /// - every opening tag name occurs as often as in the original
    /// - `href`/`src` targets are unchanged
    /// - no `<script>` element appears that the original did not have (error)
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let orig_tags = Self::count_tags(original);
        let trans_tags = Self::count_tags(translated);
        if orig_tags != trans_tags {
            report.warnings.push(format!(
                "Tag mismatch: original has {:?}, translation has {:?}",
                orig_tags, trans_tags
            ));
        }

        let orig_links = Self::extract_link_targets(original);
        let trans_links = Self::extract_link_targets(translated);
        if orig_links != trans_links {
            report.warnings.push(format!(
                "Link mismatch: original has {} targets, translation has {} targets",
                orig_links.len(),
                trans_links.len()
            ));
        }

        if Self::has_script(translated) && !Self::has_script(original) {
            report
                .errors
                .push("Translation introduced a <script> element".to_string());
        }

        report
    }

    /// Count opening tags by lowercase name
    fn count_tags(html: &str) -> BTreeMap<String, usize> {
        let regex =
            OPEN_TAG_REGEX.get_or_init(|| Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)\b").unwrap());

        let mut counts = BTreeMap::new();
        for cap in regex.captures_iter(html) {
            *counts.entry(cap[1].to_ascii_lowercase()).or_insert(0) += 1;
        }
        counts
    }

    /// Extract `href` and `src` attribute values, in document order
    fn extract_link_targets(html: &str) -> Vec<String> {
        let regex = LINK_ATTR_REGEX.get_or_init(|| {
            Regex::new(r#"(?i)\b(?:href|src)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
        });

        regex
            .captures_iter(html)
            .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn has_script(html: &str) -> bool {
        let regex = SCRIPT_REGEX.get_or_init(|| Regex::new(r"(?i)<script\b").unwrap());
        regex.is_match(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Tag Counting Tests ====================

    #[test]
    fn test_count_tags_case_insensitive() {
        let counts = TranslationValidator::count_tags("<P>one</P><p>two</p><br/>");
        assert_eq!(counts.get("p"), Some(&2));
        assert_eq!(counts.get("br"), Some(&1));
    }

    #[test]
    fn test_count_tags_ignores_closing_tags() {
        let counts = TranslationValidator::count_tags("<em>x</em>");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("em"), Some(&1));
    }

    #[test]
    fn test_count_tags_plain_text() {
        assert!(TranslationValidator::count_tags("a < b and c > d").is_empty());
    }

    // ==================== Link Extraction Tests ====================

    #[test]
    fn test_extract_link_targets_both_quote_styles() {
        let html = r#"<a href="https://a.org">a</a><img src='/uploads/b.jpg'>"#;
        let links = TranslationValidator::extract_link_targets(html);
        assert_eq!(links, vec!["https://a.org", "/uploads/b.jpg"]);
    }

    #[test]
    fn test_extract_link_targets_none() {
        assert!(TranslationValidator::extract_link_targets("<p>no links</p>").is_empty());
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_preserved_markup() {
        let original = r#"<p>A bronze <a href="/objects/2">statue</a>.</p>"#;
        let translated = r#"<p>Sebuah <a href="/objects/2">patung</a> perunggu.</p>"#;

        let report = TranslationValidator::validate(original, translated);
        assert_eq!(report, ValidationReport::default());
    }

    #[test]
    fn test_validate_dropped_tag() {
        let original = "<p>First</p><p>Second</p>";
        let translated = "<p>Premier Second</p>";

        let report = TranslationValidator::validate(original, translated);
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("Tag mismatch"));
    }

    #[test]
    fn test_validate_rewritten_link() {
        let original = r#"<a href="https://museum.example/a">link</a>"#;
        let translated = r#"<a href="https://museum.example/b">lien</a>"#;

        let report = TranslationValidator::validate(original, translated);
        assert!(report.warnings.iter().any(|w| w.contains("Link mismatch")));
    }

    #[test]
    fn test_validate_injected_script_is_error() {
        let report = TranslationValidator::validate("<p>hi</p>", "<p>hola</p><script>x()</script>");
        assert!(report.has_errors());
    }

    #[test]
    fn test_validate_plain_text_fields() {
        let report = TranslationValidator::validate("Bronze statue", "Patung perunggu");
        assert_eq!(report, ValidationReport::default());
    }

    #[test]
    fn test_validation_report_default_is_empty() {
        let report = ValidationReport::default();
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }
}
