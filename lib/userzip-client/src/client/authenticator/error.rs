//! Authentication error types.

/// Errors that can occur while obtaining or using an OAuth2 token.
///
/// All of them are fatal for the request that triggered them: the
/// authenticator never retries.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthenticationError {
    /// The token endpoint URL cannot be derived from the base URL.
    #[display("Invalid token endpoint URL '{url}': {reason}")]
    InvalidTokenEndpoint {
        /// The URL that was rejected.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The token request could not be sent or its response could not be read.
    #[display("Token request failed: {reason}")]
    TokenRequestFailed {
        /// Description of the transport failure.
        reason: String,
    },

    /// The token endpoint answered with a non-success status.
    #[display("Token endpoint rejected the credentials with status {status}: {body}")]
    TokenRejected {
        /// The HTTP status code returned by the token endpoint.
        status: u16,
        /// The response body, kept for diagnosis.
        body: String,
    },

    /// The token endpoint answered with something that is not a token.
    #[display("Invalid OAuth2 token response: {reason}")]
    InvalidTokenResponse {
        /// Description of what was invalid.
        reason: String,
    },

    /// The obtained token cannot be sent as an HTTP header.
    #[display("Token contains invalid characters: {message}")]
    InvalidTokenHeader {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// The client credentials cannot be encoded as Basic authentication.
    #[display("Invalid client credentials: {message}")]
    InvalidCredentials {
        /// Description of the problem.
        message: String,
    },
}
