use std::future::Future;
use std::net::TcpListener;
use std::time::Duration;

use crate::{ApiClient, ApiClientBuilder};

/// A server that a [`TestClient`](super::TestClient) can start on a random port.
///
/// # Example
///
/// ```rust,no_run
/// use std::net::TcpListener;
///
/// use userzip_client::ApiClient;
/// use userzip_client::test_client::{TestServer, TestServerConfig};
///
/// #[derive(Debug)]
/// struct MyServer;
///
/// impl TestServer for MyServer {
///     async fn launch(&self, listener: TcpListener) {
///         listener.set_nonblocking(true).expect("non-blocking listener");
///         let _listener = tokio::net::TcpListener::from_std(listener).expect("valid listener");
///         // serve requests...
///     }
///
///     fn config(&self) -> TestServerConfig {
///         TestServerConfig {
///             api_client: Some(ApiClient::builder().with_credentials("client", "secret")),
///             ..TestServerConfig::default()
///         }
///     }
/// }
/// ```
pub trait TestServer {
    /// Serves requests on `listener` until the task is aborted.
    fn launch(&self, listener: TcpListener) -> impl Future<Output = ()> + Send;

    /// Whether the server is ready.
    ///
    /// `None` means "unknown": readiness is then checked by opening a TCP
    /// connection.
    fn is_healthy(&self, _client: &ApiClient) -> impl Future<Output = Option<bool>> + Send {
        std::future::ready(None)
    }

    /// Client and health-check settings.
    fn config(&self) -> TestServerConfig {
        TestServerConfig::default()
    }
}

/// Settings of a [`TestServer`].
///
/// The base URL of `api_client` is always replaced by the address of the
/// started server; its credentials and status policy are kept.
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    /// Builder of the client pointing at the server.
    pub api_client: Option<ApiClientBuilder>,
    /// First delay between health checks.
    pub min_backoff_delay: Duration,
    /// Longest delay between health checks.
    pub max_backoff_delay: Duration,
    /// Whether to add jitter to the delays.
    pub backoff_jitter: bool,
    /// Number of health checks before giving up.
    pub max_retry_attempts: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            api_client: None,
            min_backoff_delay: Duration::from_millis(10),
            max_backoff_delay: Duration::from_secs(1),
            backoff_jitter: true,
            max_retry_attempts: 10,
        }
    }
}
