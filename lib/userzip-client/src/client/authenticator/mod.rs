//! OAuth2 client-credentials authentication.
//!
//! An [`Authenticator`] is bound to one [`Scope`]. On first need it requests a
//! token from `{base_url}/oauth/token` with the client credentials, caches
//! `"{token_type} {access_token}"` and hands it out as the `Authorization`
//! header value of every later request. There is no refresh and no expiry
//! check: a token is assumed valid for the lifetime of its authenticator.
//!
//! ```rust,no_run
//! use userzip_client::{Authenticator, Credentials, Scope};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::new("https://api.example.com", "client-id", "client-secret")?;
//! let authenticator = Authenticator::new(reqwest::Client::new(), credentials.into(), Scope::read());
//!
//! // Token acquired on first call, cached afterwards
//! let header = authenticator.auth_header().await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use url::Url;

use super::{ApiClientError, Scope, SecureString};

mod error;
mod provider;
mod token;

pub use self::error::AuthenticationError;
pub use self::token::{OAuth2Token, TokenCache};

/// Relative path of the token endpoint.
pub const TOKEN_PATH: &str = "oauth/token";

/// Connection credentials, supplied once when the client is built.
#[derive(Clone)]
pub struct Credentials {
    base_url: Url,
    client_id: String,
    client_secret: SecureString,
}

impl Credentials {
    /// Creates credentials for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute `http(s)` URL.
    pub fn new(
        base_url: impl AsRef<str>,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<Self, ApiClientError> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        Ok(Self {
            base_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    /// The base URL, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The OAuth2 client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &SecureString {
        &self.client_secret
    }

    /// The token endpoint URL.
    ///
    /// # Errors
    ///
    /// Fails if the endpoint cannot be joined to the base URL.
    pub fn token_url(&self) -> Result<Url, AuthenticationError> {
        self.base_url
            .join(TOKEN_PATH)
            .map_err(|err| AuthenticationError::InvalidTokenEndpoint {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Parses a base URL and makes sure relative joins stay below it.
pub(crate) fn normalize_base_url(base_url: &str) -> Result<Url, ApiClientError> {
    let mut url = Url::parse(base_url).map_err(|err| ApiClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Produces the `Authorization` header value for one scope.
pub struct Authenticator {
    client: reqwest::Client,
    credentials: Arc<Credentials>,
    scope: Scope,
    cache: TokenCache,
}

impl Authenticator {
    /// Creates an authenticator; no network call happens until a header is needed.
    pub fn new(client: reqwest::Client, credentials: Arc<Credentials>, scope: Scope) -> Self {
        Self {
            client,
            credentials,
            scope,
            cache: TokenCache::new(),
        }
    }

    /// The scope requested by this authenticator.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The cached token, without triggering a fetch.
    pub fn cached_token(&self) -> Option<&OAuth2Token> {
        self.cache.get()
    }

    /// The cached `Authorization` value, without triggering a fetch.
    pub fn cached_header(&self) -> Option<SecureString> {
        self.cache.get().map(OAuth2Token::authorization)
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .field("scope", &self.scope)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
