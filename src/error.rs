use std::time::Duration;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum MgcError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Every attempt failed with a retryable error.
    #[error("max retry attempts reached after {attempts} attempts: {source}")]
    RetryExhausted {
        /// Number of attempts that were made.
        attempts: usize,
        /// Error returned by the last attempt.
        source: Box<MgcError>,
    },
    /// The overall request deadline expired, backoff sleeps included.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Input rejected before any request was sent.
    #[error("validation error: {field} - {message}")]
    Validation { field: String, message: String },
    /// Request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(serde_json::Error),
    /// Response decoding or shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// Invalid or missing client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl MgcError {
    pub(crate) fn empty(field: &str) -> Self {
        Self::Validation {
            field: field.to_owned(),
            message: "cannot be empty".to_owned(),
        }
    }

    /// HTTP status of the failure, looking through [`MgcError::RetryExhausted`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RetryExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns `true` when the API answered `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` for failures the executor retries: transport errors,
    /// `429 Too Many Requests` and any `5xx`.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => !err.is_builder(),
            Self::Http { status, .. } => crate::retry::should_retry(*status),
            _ => false,
        }
    }
}

/// Rejects an empty path identifier before any I/O happens.
pub(crate) fn ensure_not_empty(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(MgcError::empty(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_not_empty, MgcError};

    #[test]
    fn status_looks_through_retry_exhausted() {
        let err = MgcError::RetryExhausted {
            attempts: 3,
            source: Box::new(MgcError::Http {
                status: 503,
                body: "unavailable".to_owned(),
            }),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().starts_with("max retry attempts reached"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn only_throttling_and_server_errors_are_retryable() {
        let http = |status| MgcError::Http {
            status,
            body: String::new(),
        };
        assert!(http(429).is_retryable());
        assert!(http(500).is_retryable());
        assert!(http(599).is_retryable());
        assert!(!http(404).is_retryable());
        assert!(!http(409).is_retryable());
        assert!(!MgcError::Decode("bad".to_owned()).is_retryable());
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        let err = ensure_not_empty("clusterID", "  ").expect_err("blank id must fail");
        match err {
            MgcError::Validation { field, message } => {
                assert_eq!(field, "clusterID");
                assert_eq!(message, "cannot be empty");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(ensure_not_empty("clusterID", "abc").is_ok());
    }
}
