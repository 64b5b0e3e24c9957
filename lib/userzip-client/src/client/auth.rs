use std::fmt;

use base64::Engine;
use http::HeaderValue;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::authenticator::AuthenticationError;

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// Client secrets and cached tokens are stored in this type so they never show
/// up in `Debug` output and are masked when displayed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    ///
    /// # Security Note
    /// The returned reference should not be stored for extended periods
    /// to minimize exposure time of sensitive data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn mask_sensitive(value: &str) -> String {
        if value.len() <= 8 {
            "***".to_string()
        } else {
            let head = value.chars().take(4).collect::<String>();
            let tail = value
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<String>();
            format!("{head}...{tail}")
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// The value of an `Authorization` header sent by the client.
///
/// - `Basic` is used against the token endpoint with the client credentials.
/// - `Token` carries the `"{token_type} {access_token}"` value obtained from
///   the token endpoint and is sent verbatim on every resource request.
#[derive(Clone)]
pub enum Authentication {
    /// HTTP Basic authentication (RFC 7617).
    Basic {
        /// The username, i.e. the OAuth2 client id.
        username: String,
        /// The password, i.e. the OAuth2 client secret.
        password: SecureString,
    },

    /// A complete authorization value, e.g. `Bearer abc123`.
    Token(SecureString),
}

impl Authentication {
    /// Converts the authentication into an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError` if the data contains characters that are
    /// not allowed in an HTTP header, or if a Basic username contains `:`.
    pub fn to_header(&self) -> Result<HeaderValue, AuthenticationError> {
        match self {
            Self::Basic { username, password } => {
                if username.contains(':') {
                    return Err(AuthenticationError::InvalidCredentials {
                        message: "client id cannot contain colon (:) character".to_string(),
                    });
                }

                let credentials = format!("{username}:{}", password.as_str());
                let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);

                let mut value = HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|e| {
                    AuthenticationError::InvalidCredentials {
                        message: e.to_string(),
                    }
                })?;
                value.set_sensitive(true);
                Ok(value)
            }

            Self::Token(token) => {
                let mut value = HeaderValue::from_str(token.as_str()).map_err(|e| {
                    AuthenticationError::InvalidTokenHeader {
                        message: e.to_string(),
                    }
                })?;
                value.set_sensitive(true);
                Ok(value)
            }
        }
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, password } => write!(f, "Basic {username}:{password}"),
            Self::Token(token) => write!(f, "{token}"),
        }
    }
}
