//! GoCardless HTTP client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gocardless_core::{Context, Transport, TransportError};
use reqwest::{header, Client, Method};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// GoCardless API client.
///
/// Implements [`Transport`], so it can be handed to resources directly or
/// wrapped in a [`Context`].
#[derive(Debug, Clone)]
pub struct GoCardlessClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl GoCardlessClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the access token is empty and
    /// [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.access_token.is_empty() {
            return Err(ClientError::Configuration(
                "access token must not be empty".into(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url(),
            access_token: config.access_token.clone(),
        })
    }

    /// Create a client from [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Wrap the client in a [`Context`] for top-level fetches.
    #[must_use]
    pub fn into_context(self) -> Context {
        Context::new(Arc::new(self))
    }

    /// Base URL every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a path relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.request(Method::GET, path, None).await
    }

    /// POST a JSON body to a path relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn post(&self, path: &str, params: &Value) -> Result<Value, ClientError> {
        self.request(Method::POST, path, Some(params)).await
    }

    /// PUT to a path relative to the base URL, with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn put(&self, path: &str, params: Option<&Value>) -> Result<Value, ClientError> {
        self.request(Method::PUT, path, params).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, path = %path, "GoCardless API request");

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.access_token)
            .header(header::ACCEPT, "application/json");
        if let Some(params) = params {
            request = request.json(params);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response(response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        tracing::debug!(status = %status, "GoCardless API response");

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<Value, _> = response.json().await;

        let message = match error_body {
            Ok(body) => error_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
            Err(_) => format!("HTTP {status}"),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Extract the message from an `{"error": ...}` body.
///
/// The API reports either a single string or a list of strings.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(messages) => Some(
            messages
                .iter()
                .map(|m| m.as_str().map_or_else(|| m.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl Transport for GoCardlessClient {
    async fn api_get(&self, path: &str) -> Result<Value, TransportError> {
        Ok(self.get(path).await?)
    }

    async fn api_post(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        Ok(self.post(path, params).await?)
    }

    async fn api_put(&self, path: &str, params: Option<&Value>) -> Result<Value, TransportError> {
        Ok(self.put(path, params).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_creation() {
        let config = ClientConfig::new("token").with_base_url("http://localhost:8080");
        let client = GoCardlessClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = ClientConfig::new("token").with_base_url("http://localhost:8080/");
        let client = GoCardlessClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = GoCardlessClient::new(&ClientConfig::new("")).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn error_message_shapes() {
        assert_eq!(
            error_message(&json!({"error": "not found"})).as_deref(),
            Some("not found")
        );
        assert_eq!(
            error_message(&json!({"error": ["amount is too low", "name is blank"]})).as_deref(),
            Some("amount is too low; name is blank")
        );
        assert_eq!(error_message(&json!({"message": "nope"})), None);
    }
}
