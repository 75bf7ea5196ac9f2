//! HTTP client for the documents API.

mod documents;
mod repository;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// HTTP client for an Appwrite-style documents API.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl AppwriteClient {
    /// Create a new client. The project and API key headers are attached to
    /// every request.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-appwrite-project", header_value(&config.project_id)?);
        if let Some(api_key) = &config.api_key {
            let mut value = header_value(api_key)?;
            value.set_sensitive(true);
            headers.insert("x-appwrite-key", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create from environment (see [`ClientConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of a collection's documents, or of one document when `id` is given.
    fn documents_url(&self, collection: &str, id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint)
            .map_err(|err| ClientError::Config(format!("Invalid APPWRITE_ENDPOINT: {err}")))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::Config(format!(
                    "APPWRITE_ENDPOINT cannot be a base URL: {}",
                    self.config.endpoint
                ))
            })?;
            segments.pop_if_empty().extend([
                "databases",
                self.config.database_id.as_str(),
                "collections",
                collection,
                "documents",
            ]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Handle error responses.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(ClientError::from)
        } else {
            Err(server_error(response).await)
        }
    }

    /// Handle delete responses (no body expected).
    async fn handle_delete_response(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(server_error(response).await)
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ClientError::Config("header values must be visible ASCII".to_string()))
}

/// Builds a [`ClientError::ServerError`], preferring the `message` field of a
/// JSON error body over the raw text.
async fn server_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(text);
    ClientError::ServerError { status, message }
}
