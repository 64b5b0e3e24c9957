use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

mod auth;
pub use self::auth::{Authentication, SecureString};

mod authenticator;
pub use self::authenticator::{
    AuthenticationError, Authenticator, Credentials, OAuth2Token, TOKEN_PATH, TokenCache,
};

mod body;
pub use self::body::CallBody;

mod builder;
pub use self::builder::{
    ApiClientBuilder, ENV_BASE_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_STATUS_POLICY,
    StatusPolicy,
};

mod error;
pub use self::error::ApiClientError;

mod response;
pub use self::response::ApiResponse;

mod scope;
pub use self::scope::Scope;

mod scoped;
pub use self::scoped::ScopedClient;

/// Client of the users and zip-codes API.
///
/// Every operation takes the scope it runs with. The client keeps one
/// [`ScopedClient`] per scope, created on first use; its token is reused by
/// every later call with that scope until the scope is discarded.
///
/// Cloning is cheap and clones share the scope cache.
///
/// # Example
///
/// ```rust,no_run
/// use userzip_client::{ApiClient, Scope};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new("http://localhost:8080", "client-id", "client-secret")?;
///
/// client.expand_zip_codes(&Scope::write(), &["75001", "75002"]).await?;
/// let response = client.get_zip_codes(&Scope::read()).await?;
/// assert!(response.contains("75001"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    credentials: Arc<Credentials>,
    status_policy: StatusPolicy,
    scopes: Arc<RwLock<HashMap<Scope, ScopedClient>>>,
}

impl ApiClient {
    /// Creates a builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Creates a client with the default [`StatusPolicy`].
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute `http(s)` URL.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<Self, ApiClientError> {
        Self::builder()
            .with_base_url(base_url)
            .with_credentials(client_id, client_secret)
            .build()
    }

    /// The base URL, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        self.credentials.base_url()
    }

    /// The policy applied to non-success statuses.
    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Returns the client bound to `scope`, creating it on first use.
    pub async fn scoped(&self, scope: impl Into<Scope>) -> ScopedClient {
        let scope = scope.into();

        if let Some(scoped) = self.scopes.read().await.get(&scope) {
            return scoped.clone();
        }

        let mut scopes = self.scopes.write().await;
        scopes
            .entry(scope)
            .or_insert_with_key(|scope| {
                debug!(%scope, "creating scoped client");
                ScopedClient::new(
                    self.client.clone(),
                    Arc::clone(&self.credentials),
                    scope.clone(),
                    self.status_policy,
                )
            })
            .clone()
    }

    /// Forgets the client of `scope`; its next use authenticates again.
    ///
    /// Returns whether a client was cached for that scope.
    pub async fn discard_scope(&self, scope: &Scope) -> bool {
        let removed = self.scopes.write().await.remove(scope).is_some();
        debug!(%scope, removed, "scope discarded");
        removed
    }

    /// Forgets every scoped client.
    pub async fn clear_scopes(&self) {
        self.scopes.write().await.clear();
    }

    /// The scopes that currently have a client, sorted.
    pub async fn cached_scopes(&self) -> Vec<Scope> {
        let mut scopes = self.scopes.read().await.keys().cloned().collect::<Vec<_>>();
        scopes.sort();
        scopes
    }
}
