use std::path::PathBuf;

use http::StatusCode;

use super::authenticator::AuthenticationError;

/// Errors that can occur when using the [`ApiClient`](super::ApiClient).
///
/// Non-success statuses of domain endpoints are only turned into
/// [`ApiClientError::RemoteError`] under [`StatusPolicy::Raise`](super::StatusPolicy::Raise)
/// or through [`ApiResponse::error_for_status`](super::ApiResponse::error_for_status).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// The token could not be obtained.
    ///
    /// Fatal for the call that triggered it, never retried.
    #[display("Authentication failed: {_0}")]
    Authentication(AuthenticationError),

    /// The process-wide client was used before [`initialize`](crate::initialize).
    #[display("The API client has not been initialized")]
    #[from(skip)]
    NotInitialized,

    /// A required argument is absent or unusable; no request was sent.
    #[display("Invalid argument '{name}': {reason}")]
    #[from(skip)]
    InvalidArgument {
        /// The argument name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A domain endpoint answered with a non-success status.
    #[display("Remote error {status}: {body}")]
    #[from(skip)]
    RemoteError {
        /// The response status.
        status: StatusCode,
        /// The response body, unmodified.
        body: String,
    },

    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when the request cannot be sent or the response cannot be read.
    #[display("Transport error: {_0}")]
    Transport(reqwest::Error),

    /// The base URL cannot be used to build endpoint URLs.
    #[display("Invalid base URL '{url}': {reason}")]
    #[from(skip)]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required configuration value is missing.
    #[display("Missing configuration: {name}")]
    #[from(skip)]
    MissingConfiguration {
        /// Name of the missing setting or environment variable.
        name: &'static str,
    },

    /// A configuration value cannot be parsed.
    #[display("Invalid configuration '{name}': {reason}")]
    #[from(skip)]
    InvalidConfiguration {
        /// Name of the setting or environment variable.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// JSON serialization or deserialization error.
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    /// A local file could not be read.
    #[display("Cannot read file '{}': {error}", path.display())]
    #[from(skip)]
    File {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O error.
        error: std::io::Error,
    },
}

impl ApiClientError {
    /// The remote status, for errors raised from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RemoteError { status, .. } => Some(*status),
            Self::Authentication(AuthenticationError::TokenRejected { status, .. }) => {
                StatusCode::from_u16(*status).ok()
            }
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}
