//! Error types for Zendesk API operations.

/// Error from Zendesk API operations.
#[derive(Debug, thiserror::Error)]
pub enum ZendeskError {
    /// Credentials rejected (401/403). Never retried.
    #[error("authentication failed: HTTP {status} - {body}")]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Resource does not exist (404).
    #[error("not found: {url}")]
    NotFound {
        /// Requested URL.
        url: String,
    },

    /// Too many requests (429).
    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited {
        /// Seconds from the `Retry-After` header, if present.
        retry_after: Option<u64>,
    },

    /// Server error (5xx), network failure or exhausted retries.
    #[error("transient failure: {0}")]
    Transient(String),

    /// HTTP response error not covered above (e.g. 422 validation errors).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed but did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ureq::Error> for ZendeskError {
    fn from(err: ureq::Error) -> Self {
        Self::Transient(err.to_string())
    }
}

impl ZendeskError {
    /// Map a non-success HTTP status to an error.
    pub(crate) fn from_status(
        status: u16,
        url: &str,
        body: String,
        retry_after: Option<u64>,
    ) -> Self {
        match status {
            401 | 403 => Self::Auth { status, body },
            404 => Self::NotFound {
                url: url.to_owned(),
            },
            429 => Self::RateLimited { retry_after },
            500..=599 => Self::Transient(format!("HTTP {status} - {body}")),
            _ => Self::HttpResponse { status, body },
        }
    }

    /// True for authentication failures, which abort any run.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// True when the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when the request may succeed if sent again later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transient(_))
    }

    /// Server-requested delay before retrying, in seconds.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
