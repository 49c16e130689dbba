use reqwest::StatusCode;
use shared::models::ErrorResponse;
use thiserror::Error;

use crate::storage::StorageError;

/// Result alias for gateway calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the API gateway.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received: connection refused, DNS, timeout.
    #[error("request to the CMS backend failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend rejected the credentials; stored credentials were cleared.
    ///
    /// `status` is 401 under the default policy, but a custom
    /// [`ResponsePolicy`](crate::ResponsePolicy) may clear the session on
    /// other statuses too.
    #[error("unauthorized ({status}){}", detail_suffix(.error))]
    Unauthorized {
        /// Status that triggered the reset.
        status: StatusCode,
        /// Decoded error body, when there was one.
        error: Option<ErrorResponse>,
    },

    /// Any other non-success status.
    #[error("backend responded with {status}{}", detail_suffix(.error))]
    Status {
        /// Response status.
        status: StatusCode,
        /// Decoded error body, when it parsed.
        error: Option<ErrorResponse>,
        /// Raw response body.
        body: String,
    },

    /// A success response whose body did not match the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// The path could not be joined onto the base URL.
    #[error("invalid request path `{path}`: {source}")]
    InvalidPath {
        /// Path as given by the caller.
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// The underlying HTTP client could not be configured.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Durable storage failed while reading or writing credentials.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn detail_suffix(error: &Option<ErrorResponse>) -> String {
    error
        .as_ref()
        .map(|error| format!(": {error}"))
        .unwrap_or_default()
}

impl ClientError {
    /// HTTP status carried by this error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport(err) | Self::Decode(err) => err.status(),
            _ => None,
        }
    }

    /// `true` when the session was cleared because credentials were rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
