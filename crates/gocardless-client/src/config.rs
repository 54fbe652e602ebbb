//! Client configuration.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ClientError;

/// Sandbox API base URL.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.gocardless.com/api/v1";

/// Production API base URL.
pub const PRODUCTION_BASE_URL: &str = "https://gocardless.com/api/v1";

/// Which GoCardless environment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test environment; no real money moves.
    #[default]
    Sandbox,
    /// Live environment.
    Production,
}

impl Environment {
    /// API base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" | "live" => Ok(Self::Production),
            other => Err(ClientError::Configuration(format!(
                "unknown environment: {other}"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => f.write_str("sandbox"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Merchant access token sent as a bearer token.
    pub access_token: String,

    /// Target environment (default: sandbox).
    pub environment: Environment,

    /// Overrides the environment's base URL (used against mock servers).
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,

    /// `User-Agent` header value.
    pub user_agent: String,
}

/// Secrets file structure.
#[derive(Debug, Deserialize)]
struct GoCardlessSecrets {
    access_token: String,
    #[serde(default)]
    environment: Option<Environment>,
    #[serde(default)]
    base_url: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the sandbox environment.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            environment: Environment::default(),
            base_url: None,
            timeout_seconds: 30,
            user_agent: concat!("gocardless-rust/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Load configuration from a secrets file, falling back to environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if no access token is available
    /// or a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ClientError> {
        let secret_paths = [
            ".secrets/gocardless.json",
            "../.secrets/gocardless.json",
            "../../.secrets/gocardless.json",
        ];

        let mut config = None;
        for path in &secret_paths {
            if let Ok(secrets) = load_secrets_file::<GoCardlessSecrets>(path) {
                tracing::info!(path = %path, "Loaded GoCardless secrets from file");
                let mut loaded = Self::new(secrets.access_token);
                loaded.environment = secrets.environment.unwrap_or_default();
                loaded.base_url = secrets.base_url;
                config = Some(loaded);
                break;
            }
        }

        let mut config = match config {
            Some(config) => config,
            None => {
                tracing::debug!("GoCardless secrets file not found, using environment variables");
                let token = std::env::var("GOCARDLESS_ACCESS_TOKEN").map_err(|_| {
                    ClientError::Configuration("GOCARDLESS_ACCESS_TOKEN is not set".into())
                })?;
                Self::new(token)
            }
        };

        if let Ok(environment) = std::env::var("GOCARDLESS_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }
        if let Ok(base_url) = std::env::var("GOCARDLESS_BASE_URL") {
            config.base_url = Some(base_url);
        }
        if let Ok(timeout) = std::env::var("GOCARDLESS_TIMEOUT_SECONDS") {
            config.timeout_seconds = timeout.parse().map_err(|_| {
                ClientError::Configuration(format!("invalid GOCARDLESS_TIMEOUT_SECONDS: {timeout}"))
            })?;
        }

        Ok(config)
    }

    /// Set the environment.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Effective base URL without a trailing slash.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_sandbox() {
        let config = ClientConfig::new("token");
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.api_base_url(), SANDBOX_BASE_URL);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn base_url_override_trims_trailing_slash() {
        let config = ClientConfig::new("token").with_base_url("http://localhost:9000/");
        assert_eq!(config.api_base_url(), "http://localhost:9000");
    }

    #[test]
    fn production_base_url() {
        let config = ClientConfig::new("token").with_environment(Environment::Production);
        assert_eq!(config.api_base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn environment_parsing() {
        assert_eq!("Sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!("live".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::new("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn secrets_file_shape() {
        let secrets: GoCardlessSecrets =
            serde_json::from_str(r#"{"access_token": "abc", "environment": "production"}"#)
                .unwrap();
        assert_eq!(secrets.access_token, "abc");
        assert_eq!(secrets.environment, Some(Environment::Production));
        assert!(secrets.base_url.is_none());
    }
}
