//! OAuth2 token types and caching.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::client::SecureString;

/// The subset of the token endpoint response the client relies on.
///
/// Any other field (`expires_in`, `scope`, ...) is ignored: a token is
/// assumed valid for the lifetime of its authenticator.
#[derive(Deserialize)]
pub(super) struct TokenResponse {
    pub(super) token_type: String,
    pub(super) access_token: String,
}

/// An OAuth2 access token together with its type.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OAuth2Token {
    token_type: String,
    access_token: String,
}

impl OAuth2Token {
    /// Creates a new token.
    pub fn new(token_type: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            access_token: access_token.into(),
        }
    }

    /// Returns the token type, as sent by the token endpoint (e.g. `Bearer`).
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the access token value.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the `Authorization` header value: `"{token_type} {access_token}"`.
    pub fn authorization(&self) -> SecureString {
        SecureString::new(format!("{} {}", self.token_type, self.access_token))
    }
}

impl From<TokenResponse> for OAuth2Token {
    fn from(value: TokenResponse) -> Self {
        let TokenResponse {
            token_type,
            access_token,
        } = value;
        Self::new(token_type, access_token)
    }
}

impl fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("token_type", &self.token_type)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Write-once cache for an OAuth2 token.
///
/// The first caller runs the fetch while concurrent callers wait for it, so a
/// single token request is issued per cache. A failed fetch leaves the cache
/// empty and the error goes to the caller.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<OnceCell<OAuth2Token>>,
}

impl TokenCache {
    /// Creates a new empty token cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token, if any.
    pub fn get(&self) -> Option<&OAuth2Token> {
        self.inner.get()
    }

    /// Returns the cached token, running `fetch` to obtain it when the cache is empty.
    pub async fn get_or_try_fetch<F, Fut, E>(&self, fetch: F) -> Result<&OAuth2Token, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<OAuth2Token, E>>,
    {
        self.inner.get_or_try_init(fetch).await
    }
}
