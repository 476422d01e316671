//! Gateway error types.

use thiserror::Error;

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while calling the Eventbrite API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required setting (credential) is missing.
    #[error("{0} is not configured")]
    Configuration(&'static str),

    /// The provider answered with a non-success status.
    #[error("Eventbrite request failed ({status} {status_text}): {body}")]
    Upstream {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request could not be completed at the network level.
    #[error("Eventbrite request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The base URL and path did not form a valid URL.
    #[error("Invalid Eventbrite URL: {0}")]
    InvalidUrl(String),

    /// The provider answered with a body that is not JSON.
    #[error("Eventbrite returned an unreadable body: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Create an upstream error from a status code and response body.
    pub fn upstream(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::Upstream {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.into(),
        }
    }

    /// Whether the failure came from missing configuration rather than the provider.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
