//! Libris API client error types.
//!
//! Every failed call resolves to exactly one variant, so callers can branch
//! on network failure, rejected credentials, missing resources, and every
//! other non-2xx status without inspecting raw responses.

/// Errors from Libris API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// TLS failure, ...).
    #[error("network error calling {endpoint}: {source}")]
    Network {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The server answered 401 or 403.
    #[error("{endpoint} rejected the request as unauthorized ({status}): {body}")]
    Unauthorized {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The server answered 404.
    #[error("{endpoint} returned 404: {body}")]
    NotFound { endpoint: String, body: String },
    /// The server answered any other non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// A 2xx response body could not be decoded.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// The stored credential cannot be sent as a header value.
    #[error("credential cannot be encoded as an Authorization header for {endpoint}")]
    InvalidCredential { endpoint: String },
}

impl ApiError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Network { .. }
            | Self::Deserialization { .. }
            | Self::InvalidCredential { .. } => None,
        }
    }

    /// Whether the server rejected the caller's credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether the request failed before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// The human-readable body the server sent with an error status, if any.
    pub fn server_message(&self) -> Option<&str> {
        let body = match self {
            Self::Unauthorized { body, .. } | Self::NotFound { body, .. } | Self::Status { body, .. } => body,
            _ => return None,
        };
        let trimmed = body.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
