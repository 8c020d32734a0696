//! Client configuration for the GraphQL backend.
//!
//! # Responsibility
//! - Hold every transport setting in one explicit value passed at
//!   construction time, instead of process-wide globals.
//! - Load overrides from TOML with per-field defaults.
//!
//! # Invariants
//! - `validate()` must pass before a transport is built from the config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/graphql";
pub const DEFAULT_APPLICATION_ID: &str = "APPLICATION_ID";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How GraphQL `errors` returned next to `data` are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Any reported error fails the operation, even when data is present.
    None,
    /// Errors are dropped; present data is returned as success.
    Ignore,
    /// Present data is returned as success and errors are logged.
    All,
}

impl ErrorPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ignore => "ignore",
            Self::All => "all",
        }
    }
}

/// Settings for talking to the GraphQL backend.
///
/// Every request is sent to the network; there is no response cache to
/// configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full GraphQL endpoint URL.
    pub endpoint: String,
    /// Value sent as `X-Parse-Application-Id` on every request.
    pub application_id: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent. Falls back to `taskroster/<version>`.
    pub user_agent: Option<String>,
    pub query_error_policy: ErrorPolicy,
    pub mutation_error_policy: ErrorPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            application_id: DEFAULT_APPLICATION_ID.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: None,
            query_error_policy: ErrorPolicy::All,
            mutation_error_policy: ErrorPolicy::None,
        }
    }
}

impl ClientConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - `endpoint` parses as an `http` or `https` URL
    /// - `application_id` is not blank
    /// - `timeout_seconds` is greater than 0
    pub fn validate(&self) -> ConfigResult<()> {
        self.endpoint_url()?;
        if self.application_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "application_id must not be empty".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn endpoint_url(&self) -> ConfigResult<Url> {
        let url = Url::parse(self.endpoint.trim()).map_err(|err| {
            ConfigError::Invalid(format!("endpoint `{}` is not a valid URL: {err}", self.endpoint))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Invalid(format!(
                "endpoint scheme must be http or https, got `{other}`"
            ))),
        }
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("taskroster/{}", env!("CARGO_PKG_VERSION")))
    }
}
