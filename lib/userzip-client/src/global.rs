//! Process-wide client, for callers that want a single shared instance.

use std::sync::OnceLock;

use tracing::{debug, info};

use crate::{ApiClient, ApiClientError, SecureString};

static INSTANCE: OnceLock<ApiClient> = OnceLock::new();

/// Creates the process-wide client.
///
/// Only the first successful call configures the client; later calls are
/// no-ops and their arguments are ignored.
///
/// # Errors
///
/// Fails if the first configuration is invalid, leaving the instance
/// uninitialized.
pub fn initialize(
    base_url: impl Into<String>,
    client_id: impl Into<String>,
    client_secret: impl Into<SecureString>,
) -> Result<&'static ApiClient, ApiClientError> {
    if let Some(client) = INSTANCE.get() {
        debug!("API client already initialized");
        return Ok(client);
    }

    let client = ApiClient::new(base_url, client_id, client_secret)?;
    let client = INSTANCE.get_or_init(|| {
        info!(base_url = %client.base_url(), "process-wide API client initialized");
        client
    });
    Ok(client)
}

/// Returns the process-wide client.
///
/// # Errors
///
/// Fails with [`ApiClientError::NotInitialized`] before [`initialize`].
pub fn instance() -> Result<&'static ApiClient, ApiClientError> {
    INSTANCE.get().ok_or(ApiClientError::NotInitialized)
}
