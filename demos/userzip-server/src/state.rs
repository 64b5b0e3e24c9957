use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::auth::TokenStore;
use crate::users::repository::Directory;

/// Client credentials accepted by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub client_id: String,
    pub client_secret: String,
    pub zip_codes: Vec<String>,
}

impl ServerConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            zip_codes: Vec::new(),
        }
    }

    /// Zip codes available when the server starts.
    #[must_use]
    pub fn with_zip_codes<I, Z>(mut self, zip_codes: I) -> Self
    where
        I: IntoIterator<Item = Z>,
        Z: Into<String>,
    {
        self.zip_codes = zip_codes.into_iter().map(Into::into).collect();
        self
    }
}

/// The application state
#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    #[from_ref(skip)]
    started_at: Instant,
    config: Arc<ServerConfig>,
    tokens: TokenStore,
    directory: Directory,
}

impl AppState {
    /// Create a state, seeding the available zip codes from the configuration
    pub fn new(config: ServerConfig) -> Self {
        let started_at = Instant::now();
        let directory = Directory::new(config.zip_codes.iter().cloned());

        Self {
            started_at,
            config: Arc::new(config),
            tokens: TokenStore::default(),
            directory,
        }
    }

    /// Number of tokens issued since the server started
    pub async fn issued_tokens(&self) -> usize {
        self.tokens.issued().await
    }

    pub(crate) fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
