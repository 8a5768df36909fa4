use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{SearchError, SearchOpResult};
use crate::types::{ImageBlob, InputSelection, SearchResult};

/// Configuration for the search service connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    pub base_url: String,
    pub search_path: String,
    /// Request timeout. None reproduces the stock behavior of waiting
    /// indefinitely on a hung request.
    pub timeout_ms: Option<u64>,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            search_path: "/api/search".to_string(),
            timeout_ms: None,
        }
    }
}

impl SearchServiceConfig {
    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, self.search_path)
    }
}

/// HTTP client for the similarity-search endpoint
///
/// Wraps the single POST the service exposes: a multipart body carrying
/// exactly one field, either the image bytes or the image URL.
#[derive(Debug, Clone)]
pub struct SearchClient {
    config: SearchServiceConfig,
    client: Client,
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchClient {
    /// Create a client with the default service configuration
    pub fn new() -> Self {
        Self::with_config(SearchServiceConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: SearchServiceConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build().expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Get configuration
    pub fn config(&self) -> &SearchServiceConfig {
        &self.config
    }

    /// Submit the selected input and return the service's matches
    ///
    /// Failures are classified: a request that never reached the service maps
    /// to `TransportUnreachable`, a non-2xx status or unreadable body maps to
    /// `SearchFailed`.
    pub async fn search(&self, selection: &InputSelection) -> SearchOpResult<Vec<SearchResult>> {
        let form = match selection {
            InputSelection::None => return Err(SearchError::MissingInput),
            InputSelection::Url(url) => Form::new().text("image_url", url.clone()),
            InputSelection::File(blob) => Form::new().part("image_file", Self::file_part(blob)?),
        };

        let search_url = self.config.search_url();
        log::debug!("🔍 Dispatching visual search to {}", search_url);

        let response = self.client.post(&search_url).multipart(form).send().await?;

        let status = response.status();
        if status.is_success() {
            let results =
                response
                    .json::<Vec<SearchResult>>()
                    .await
                    .map_err(|e| SearchError::SearchFailed {
                        message: format!("Failed to parse search response: {}", e),
                    })?;
            log::debug!("✅ Search returned {} matches", results.len());
            Ok(results)
        } else {
            log::warn!("⚠️ Search service answered HTTP {}", status);
            Err(SearchError::SearchFailed {
                message: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            })
        }
    }

    fn file_part(blob: &ImageBlob) -> SearchOpResult<Part> {
        let mut part = Part::bytes(blob.bytes.clone()).file_name(blob.file_name.clone());
        if let Some(mime_type) = &blob.mime_type {
            part = part.mime_str(mime_type)?;
        }
        Ok(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchServiceConfig::default();

        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.search_path, "/api/search");
        assert_eq!(config.timeout_ms, None);
        assert_eq!(config.search_url(), "http://127.0.0.1:8000/api/search");
    }

    #[test]
    fn test_custom_config() {
        let config = SearchServiceConfig {
            base_url: "http://search.internal:9000".to_string(),
            search_path: "/v2/similar".to_string(),
            timeout_ms: Some(5000),
        };

        let client = SearchClient::with_config(config.clone());
        assert_eq!(client.config().base_url, "http://search.internal:9000");
        assert_eq!(client.config().search_url(), "http://search.internal:9000/v2/similar");
        assert_eq!(client.config().timeout_ms, Some(5000));
    }

    #[test]
    fn test_config_serialization() {
        let config = SearchServiceConfig::default();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: SearchServiceConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.base_url, config.base_url);
        assert_eq!(deserialized.search_path, config.search_path);
        assert_eq!(deserialized.timeout_ms, config.timeout_ms);
    }

    #[test]
    fn test_search_with_no_selection_is_rejected_locally() {
        let client = SearchClient::new();

        let result = tokio_test::block_on(client.search(&InputSelection::None));
        assert_eq!(result, Err(SearchError::MissingInput));
    }

    #[test]
    fn test_file_part_with_invalid_mime_is_a_search_failure() {
        let blob = ImageBlob::new("query.jpg", vec![1, 2, 3]).with_mime_type("not a mime type");

        let result = SearchClient::file_part(&blob);
        assert!(matches!(result, Err(SearchError::SearchFailed { .. })));
    }
}
