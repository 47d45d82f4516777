//! Client for the public object endpoints of the catalog API.

use crate::config::Config;
use crate::retry::{is_retryable_status, with_retry_if, RetryConfig};
use anyhow::{Context, Result};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::debug;

/// Identifier of a catalog object. The API uses both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::Number(n) => write!(f, "{}", n),
            ObjectId::Text(s) => f.write_str(s),
        }
    }
}

/// Ids are opaque: a segment only becomes `Number` when it prints back
/// identically, so `"007"` or `"+5"` stay as given.
impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(n) if n.to_string() == value => ObjectId::Number(n),
            _ => ObjectId::Text(value.to_string()),
        }
    }
}

/// A catalog object as returned by `GET /api/public/objects/get-by-id/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    /// HTML fragment, untrusted
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// JSON-encoded array of image paths
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    /// Fields this crate does not interpret, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ObjectRecord {
    /// The record's id for log lines, or `"unknown"` when the API omitted it.
    pub fn display_id(&self) -> String {
        self.id
            .as_ref()
            .map_or_else(|| "unknown".to_string(), ToString::to_string)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Non-success response from the object API.
#[derive(Debug, thiserror::Error)]
#[error("Object API error ({status}): {body}")]
pub struct ApiStatusError {
    pub status: StatusCode,
    pub body: String,
}

/// Build `{base}/api/public/objects/{tail...}` with each segment percent-encoded.
pub(crate) fn endpoint_url(base_url: &str, tail: &[&str]) -> Result<Url> {
    let mut url =
        Url::parse(base_url).with_context(|| format!("Invalid API base URL: {}", base_url))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("API base URL cannot be a base: {}", base_url))?
        .pop_if_empty()
        .extend(["api", "public", "objects"])
        .extend(tail);
    Ok(url)
}

/// Fetch one object record.
///
/// Attempts are bounded by `config.fetch_max_attempts`. Only network errors,
/// 429 and 5xx responses are retried.
pub async fn fetch_object(
    client: &reqwest::Client,
    config: &Config,
    id: &ObjectId,
) -> Result<ObjectRecord> {
    let id_segment = id.to_string();
    let url = endpoint_url(&config.api_base_url, &["get-by-id", &id_segment])?;

    with_retry_if(
        &RetryConfig::object_fetch(config.fetch_max_attempts),
        &format!("Fetch object {}", id),
        || async {
            debug!("GET {}", url);
            let response = client
                .get(url.clone())
                .send()
                .await
                .context("Failed to send object request")?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
                return Err(ApiStatusError { status, body }.into());
            }

            response
                .json::<ObjectRecord>()
                .await
                .context("Failed to parse object record")
        },
        is_retryable_error,
    )
    .await
}

/// Retry transport failures and transient statuses; everything else is final.
fn is_retryable_error(error: &anyhow::Error) -> bool {
    if let Some(status_error) = error.downcast_ref::<ApiStatusError>() {
        return is_retryable_status(status_error.status.as_u16());
    }
    if let Some(reqwest_error) = error.downcast_ref::<reqwest::Error>() {
        return !reqwest_error.is_decode();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn create_test_config(api_url: &str) -> Config {
        Config {
            api_base_url: api_url.to_string(),
            http_timeout: Duration::from_secs(5),
            fetch_max_attempts: 1,
            default_language: Language::ENGLISH,
            port: 0,
            pdf_output_path: "object-detail.pdf".to_string(),
        }
    }

    fn sample_record_json() -> serde_json::Value {
        serde_json::json!({
            "id": 7,
            "name": "Keris Pusaka",
            "category_name": "Senjata",
            "location": "Yogyakarta",
            "description": "<p>Keris dari abad ke-18.</p>",
            "image_url": "[\"/uploads/keris-1.jpg\"]",
            "created_at": "2024-05-01"
        })
    }

    // ==================== Deserialization Tests ====================

    #[test]
    fn test_record_deserialization() {
        let record: ObjectRecord = serde_json::from_value(sample_record_json()).unwrap();

        assert_eq!(record.id, Some(ObjectId::Number(7)));
        assert_eq!(record.name, "Keris Pusaka");
        assert_eq!(record.image_url, "[\"/uploads/keris-1.jpg\"]");
        assert_eq!(
            record.extra.get("created_at"),
            Some(&serde_json::json!("2024-05-01"))
        );
    }

    #[test]
    fn test_record_null_and_missing_fields_are_empty() {
        let record: ObjectRecord = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "name": null,
            "location": "Bali"
        }))
        .unwrap();

        assert_eq!(record.id, Some(ObjectId::Text("abc".to_string())));
        assert_eq!(record.name, "");
        assert_eq!(record.category_name, "");
        assert_eq!(record.location, "Bali");
        assert_eq!(record.image_url, "");
    }

    #[test]
    fn test_object_id_from_str() {
        assert_eq!(ObjectId::from("42"), ObjectId::Number(42));
        assert_eq!(ObjectId::from("a-42"), ObjectId::Text("a-42".to_string()));
        assert_eq!(ObjectId::from("42").to_string(), "42");
        assert_eq!(ObjectId::from("-3"), ObjectId::Number(-3));
    }

    #[test]
    fn test_object_id_from_str_keeps_non_canonical_numbers() {
        for raw in ["007", "+5", "-0", "1e3", " 4"] {
            assert_eq!(ObjectId::from(raw), ObjectId::Text(raw.to_string()));
            assert_eq!(ObjectId::from(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_record_without_id() {
        let record: ObjectRecord = serde_json::from_value(serde_json::json!({
            "name": "Batik Tulis",
            "category_name": "Tekstil"
        }))
        .unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.display_id(), "unknown");
        assert_eq!(record.name, "Batik Tulis");
        assert!(serde_json::to_value(&record).unwrap().get("id").is_none());
    }

    // ==================== URL Tests ====================

    #[test]
    fn test_endpoint_url() {
        let url = endpoint_url("http://localhost:9977", &["get-by-id", "12"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9977/api/public/objects/get-by-id/12"
        );
    }

    #[test]
    fn test_endpoint_url_encodes_id_segment() {
        let url = endpoint_url("http://localhost:9977/", &["get-by-id", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9977/api/public/objects/get-by-id/a%2Fb%20c"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let url = endpoint_url("https://museum.example/backend", &["translate"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://museum.example/backend/api/public/objects/translate"
        );
    }

    #[test]
    fn test_endpoint_url_invalid_base() {
        assert!(endpoint_url("not a url", &["translate"]).is_err());
    }

    // ==================== Fetch Tests ====================

    #[tokio::test]
    async fn test_fetch_object_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/objects/get-by-id/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_record_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = create_test_config(&mock_server.uri());
        let record = fetch_object(&reqwest::Client::new(), &config, &ObjectId::Number(7))
            .await
            .expect("fetch should succeed");

        assert_eq!(record.location, "Yogyakarta");
    }

    #[tokio::test]
    async fn test_fetch_object_uses_id_segment_verbatim() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/objects/get-by-id/007"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_record_json()))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/public/objects/get-by-id/7"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock_server)
            .await;

        let config = create_test_config(&mock_server.uri());
        let record = fetch_object(&reqwest::Client::new(), &config, &ObjectId::from("007"))
            .await
            .expect("fetch should hit the 007 record");

        assert_eq!(record.name, "Keris Pusaka");
    }

    #[tokio::test]
    async fn test_fetch_object_not_found_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/objects/get-by-id/999"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = create_test_config(&mock_server.uri());
        config.fetch_max_attempts = 3;

        let error = fetch_object(&reqwest::Client::new(), &config, &ObjectId::Number(999))
            .await
            .unwrap_err();

        let status_error = error.downcast_ref::<ApiStatusError>().unwrap();
        assert_eq!(status_error.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_object_single_attempt_by_default() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = create_test_config(&mock_server.uri());
        let result = fetch_object(&reqwest::Client::new(), &config, &ObjectId::Number(1)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_object_retries_server_errors_when_configured() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_record_json()))
            .mount(&mock_server)
            .await;

        let mut config = create_test_config(&mock_server.uri());
        config.fetch_max_attempts = 2;

        let record = fetch_object(&reqwest::Client::new(), &config, &ObjectId::Number(7))
            .await
            .expect("second attempt should succeed");
        assert_eq!(record.name, "Keris Pusaka");
    }

    #[tokio::test]
    async fn test_fetch_object_invalid_json_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let config = create_test_config(&mock_server.uri());
        let error = fetch_object(&reqwest::Client::new(), &config, &ObjectId::Number(7))
            .await
            .unwrap_err();

        assert!(error.to_string().contains("Failed to parse object record"));
    }
}
