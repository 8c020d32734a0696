//! HTTP transport for GraphQL requests.
//!
//! # Responsibility
//! - POST request envelopes to the configured endpoint.
//! - Inject the static application header on every request.
//!
//! # Invariants
//! - Responses are never cached; each call is a network round-trip.
//! - A non-success status is still returned as an envelope when its body is
//!   GraphQL-shaped, so GraphQL errors reach the error policy intact.

use crate::config::ClientConfig;
use crate::graphql::error::{TransportError, TransportResult};
use crate::graphql::wire::{GraphQlRequest, GraphQlResponse};
use crate::logging::sanitize_message;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::{Duration, Instant};
use url::Url;

pub const APPLICATION_ID_HEADER: &str = "X-Parse-Application-Id";
const MAX_ERROR_BODY_CHARS: usize = 240;

/// Sends one GraphQL request and returns the decoded envelope.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(&self, request: &GraphQlRequest) -> TransportResult<GraphQlResponse>;
}

/// `reqwest`-backed transport bound to one endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Builds a transport from a validated config.
    ///
    /// # Errors
    /// - `TransportError::Config` when the config is invalid, the application
    ///   id is not a legal header value, or the client cannot be built.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        config
            .validate()
            .map_err(|err| TransportError::Config(err.to_string()))?;
        let endpoint = config
            .endpoint_url()
            .map_err(|err| TransportError::Config(err.to_string()))?;

        let mut headers = HeaderMap::new();
        let app_id = HeaderValue::from_str(config.application_id.trim()).map_err(|err| {
            TransportError::Config(format!("application_id is not a valid header value: {err}"))
        })?;
        headers.insert(APPLICATION_ID_HEADER, app_id);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent())
            .build()
            .map_err(|err| TransportError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn round_trip(&self, request: &GraphQlRequest) -> TransportResult<GraphQlResponse> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<GraphQlResponse>(&body) {
            Ok(envelope) if status.is_success() || envelope.has_payload() => Ok(envelope),
            Ok(_) | Err(_) if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
                body: sanitize_message(&String::from_utf8_lossy(&body), MAX_ERROR_BODY_CHARS),
            }),
            Ok(_) => Err(TransportError::Decode("empty GraphQL envelope".into())),
            Err(err) => Err(TransportError::Decode(err.to_string())),
        }
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn execute(&self, request: &GraphQlRequest) -> TransportResult<GraphQlResponse> {
        let started_at = Instant::now();
        let operation = request.label();
        debug!("event=graphql_request module=transport status=start operation={operation}");

        match self.round_trip(request).await {
            Ok(envelope) => {
                info!(
                    "event=graphql_request module=transport status=ok operation={} duration_ms={} has_data={} error_count={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    envelope.data.is_some(),
                    envelope.errors.len()
                );
                Ok(envelope)
            }
            Err(err) => {
                error!(
                    "event=graphql_request module=transport status=error operation={} duration_ms={} error_code={} error={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        assert_eq!(transport.endpoint().as_str(), "http://localhost:8080/graphql");
    }

    #[test]
    fn rejects_application_id_that_cannot_be_a_header() {
        let config = ClientConfig {
            application_id: "bad\nid".into(),
            ..Default::default()
        };
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, TransportError::Config(_)));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ClientConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(matches!(
            HttpTransport::new(&config),
            Err(TransportError::Config(_))
        ));
    }
}
