use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use super::{ApiClient, ApiClientError, Credentials, SecureString};

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "USERZIP_BASE_URL";
/// Environment variable holding the OAuth2 client id.
pub const ENV_CLIENT_ID: &str = "USERZIP_CLIENT_ID";
/// Environment variable holding the OAuth2 client secret.
pub const ENV_CLIENT_SECRET: &str = "USERZIP_CLIENT_SECRET";
/// Environment variable holding the status policy (`return` or `raise`).
pub const ENV_STATUS_POLICY: &str = "USERZIP_STATUS_POLICY";

/// What the client does with a non-success status from a domain endpoint.
///
/// The policy is client-wide and applies to every domain operation alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum StatusPolicy {
    /// Hand the response back so the caller can assert on its status.
    #[default]
    #[display("return")]
    Return,
    /// Turn the response into [`ApiClientError::RemoteError`].
    #[display("raise")]
    Raise,
}

impl FromStr for StatusPolicy {
    type Err = ApiClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "return" => Ok(Self::Return),
            "raise" => Ok(Self::Raise),
            other => Err(ApiClientError::InvalidConfiguration {
                name: "status policy",
                reason: format!("expected 'return' or 'raise', got '{other}'"),
            }),
        }
    }
}

/// Builder for [`ApiClient`].
///
/// Base URL and credentials are required, everything else has a default:
///
/// - **Status policy**: [`StatusPolicy::Return`]
/// - **HTTP client**: a default `reqwest::Client`
///
/// # Example
///
/// ```rust
/// use userzip_client::{ApiClient, StatusPolicy};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("http://localhost:8080")
///     .with_credentials("client-id", "client-secret")
///     .with_status_policy(StatusPolicy::Raise)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiClientBuilder {
    client: Option<reqwest::Client>,
    base_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecureString>,
    status_policy: StatusPolicy,
}

impl ApiClientBuilder {
    /// Creates a builder reading its settings from the process environment.
    ///
    /// `USERZIP_BASE_URL`, `USERZIP_CLIENT_ID` and `USERZIP_CLIENT_SECRET` are
    /// required, `USERZIP_STATUS_POLICY` is optional.
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing or the policy is unknown.
    pub fn from_env() -> Result<Self, ApiClientError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Same as [`ApiClientBuilder::from_env`] with a custom variable lookup.
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing or the policy is unknown.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ApiClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ApiClientError::MissingConfiguration { name })
        };

        let base_url = required(ENV_BASE_URL)?;
        let client_id = required(ENV_CLIENT_ID)?;
        let client_secret = required(ENV_CLIENT_SECRET)?;
        let status_policy = match lookup(ENV_STATUS_POLICY) {
            Some(value) => value
                .parse::<StatusPolicy>()
                .map_err(|_| ApiClientError::InvalidConfiguration {
                    name: ENV_STATUS_POLICY,
                    reason: format!("expected 'return' or 'raise', got '{value}'"),
                })?,
            None => StatusPolicy::default(),
        };

        Ok(Self::default()
            .with_base_url(base_url)
            .with_credentials(client_id, client_secret)
            .with_status_policy(status_policy))
    }

    /// Sets the API base URL, e.g. `https://api.example.com/v1`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the OAuth2 client credentials.
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets what happens with non-success statuses.
    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }

    /// Uses a preconfigured `reqwest::Client` (timeouts, proxies, ...).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the client. No network call happens until the first operation.
    ///
    /// # Errors
    ///
    /// Fails if the base URL or the credentials are missing, or if the base
    /// URL is not an absolute `http(s)` URL.
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let Self {
            client,
            base_url,
            client_id,
            client_secret,
            status_policy,
        } = self;

        let base_url = base_url.ok_or(ApiClientError::MissingConfiguration { name: "base URL" })?;
        let client_id = client_id.ok_or(ApiClientError::MissingConfiguration { name: "client id" })?;
        let client_secret = client_secret.ok_or(ApiClientError::MissingConfiguration {
            name: "client secret",
        })?;

        let credentials = Credentials::new(base_url, client_id, client_secret)?;
        info!(
            base_url = %credentials.base_url(),
            client_id = credentials.client_id(),
            %status_policy,
            "API client configured"
        );

        Ok(ApiClient {
            client: client.unwrap_or_default(),
            credentials: Arc::new(credentials),
            status_policy,
            scopes: Arc::default(),
        })
    }
}
