//! Store API error types.

use shop_commerce::CommerceError;
use thiserror::Error;

/// Errors that can occur when talking to the store API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Failed to parse response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response parsed but does not describe a valid model.
    #[error("Invalid data from {endpoint}: {reason}")]
    Invalid { endpoint: String, reason: String },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Client construction failed.
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Shape of the service's error bodies.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl FetchError {
    pub(crate) fn invalid(endpoint: &str, err: CommerceError) -> Self {
        FetchError::Invalid {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }

    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Human-readable message for the failure.
    ///
    /// For API errors this is the `message` field of the service's
    /// `{ "type", "message" }` body, falling back to the raw body. Other
    /// variants use their display form.
    pub fn message(&self) -> String {
        match self {
            FetchError::Api { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| body.clone()),
            other => other.to_string(),
        }
    }
}
