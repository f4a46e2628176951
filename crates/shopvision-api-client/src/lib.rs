//! HTTP client for the shopvision backend.
//!
//! Provides a minimal client with multipart POST and JSON GET helpers, the task
//! endpoints (classify, search, health) and a [`TaskDispatcher`] that allows one
//! task in flight at a time.

pub mod api;
pub mod dispatcher;

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Client;
use shopvision_core::{ClientConfig, TaskError};
use std::time::Duration;

/// HTTP client for the shopvision backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client. `timeout` of `None` lets requests run indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    /// Create client from environment, see [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        config.validate()?;
        Self::from_config(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request. Deserializes the JSON response into an untyped value.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, TaskError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await.map_err(transport)?;
        let body = read_success_body(response).await?;

        serde_json::from_slice(&body)
            .map_err(|e| TaskError::MalformedResponse(format!("Malformed response body: {}", e)))
    }

    /// POST multipart form and return the raw success body.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Bytes, TaskError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "POST multipart");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        read_success_body(response).await
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn transport(err: reqwest::Error) -> TaskError {
    TaskError::Transport(err.to_string())
}

/// Read the body, turning non-2xx statuses into [`TaskError::Backend`].
async fn read_success_body(response: reqwest::Response) -> Result<Bytes, TaskError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport)?;

    if !status.is_success() {
        let detail = extract_detail(&body);
        tracing::debug!(status = %status, detail = ?detail, "Backend returned an error");
        return Err(TaskError::backend(status.as_u16(), detail));
    }

    Ok(body)
}

/// Pull the `detail` message out of an error body (`{"detail": "..."}`).
///
/// Non-string details are rendered as compact JSON; anything unparseable yields `None`.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

pub use dispatcher::TaskDispatcher;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_from_fastapi_body() {
        assert_eq!(
            extract_detail(br#"{"detail":"No filename provided"}"#),
            Some("No filename provided".to_string())
        );
    }

    #[test]
    fn structured_detail_is_serialized() {
        assert_eq!(
            extract_detail(br#"{"detail":[{"loc":["body","image"],"msg":"field required"}]}"#),
            Some(r#"[{"loc":["body","image"],"msg":"field required"}]"#.to_string())
        );
    }

    #[test]
    fn no_detail() {
        assert_eq!(extract_detail(b"Internal Server Error"), None);
        assert_eq!(extract_detail(br#"{"error":"x"}"#), None);
        assert_eq!(extract_detail(br#"{"detail":null}"#), None);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://127.0.0.1:8000/", None).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            client.build_url("/health"),
            "http://127.0.0.1:8000/health"
        );
    }
}
