//! Transport-level failures.
//!
//! GraphQL `errors` arriving inside a well-formed envelope are not transport
//! failures; they are returned with the envelope and judged by the caller's
//! error policy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport could not be constructed from config.
    #[error("transport config error: {0}")]
    Config(String),

    /// Connection-level failure (DNS, refused, reset).
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    /// Non-success status whose body is not a GraphQL envelope.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Success status with a body that is not a GraphQL envelope.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "transport_config",
            Self::Http(_) => "http_failed",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "bad_status",
            Self::Decode(_) => "bad_body",
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout(value.to_string())
        } else if value.is_builder() {
            Self::Config(value.to_string())
        } else {
            Self::Http(value.to_string())
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::TransportError;

    #[test]
    fn display_status() {
        let err = TransportError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "unexpected HTTP status 502: bad gateway");
        assert_eq!(err.code(), "bad_status");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransportError>();
    }
}
