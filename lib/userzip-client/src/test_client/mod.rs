//! Harness starting a server under test next to an [`ApiClient`].
//!
//! [`TestClient::start`] binds a random local port, spawns the server's
//! [`TestServer::launch`] on it, waits for the server to become healthy with
//! exponential back-off and returns a client pointing at it. The server task
//! is aborted when the [`TestClient`] is dropped.
//!
//! ```rust,no_run
//! # use userzip_client::test_client::{TestClient, TestServer};
//! # use userzip_client::Scope;
//! # async fn example<S: TestServer + Send + Sync + 'static>(server: S) -> Result<(), Box<dyn std::error::Error>> {
//! let client = TestClient::start(server).await?;
//!
//! let response = client.get_zip_codes(&Scope::read()).await?;
//! assert!(response.is_success());
//! # Ok(())
//! # }
//! ```

use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, error};

use crate::ApiClient;

mod error;
pub use self::error::*;

mod test_server;
pub use self::test_server::*;

/// An [`ApiClient`] bound to a running [`TestServer`].
#[derive(Debug, derive_more::Deref)]
pub struct TestClient<T> {
    local_addr: SocketAddr,
    #[deref]
    client: ApiClient,
    handle: Option<tokio::task::JoinHandle<()>>,
    test_server: Arc<T>,
}

impl<T> TestClient<T>
where
    T: TestServer + Send + Sync + 'static,
{
    /// Starts `test_server` on `127.0.0.1` with a random port.
    ///
    /// # Errors
    ///
    /// Fails if the port cannot be bound, the client cannot be built, or the
    /// server does not become healthy.
    pub async fn start(test_server: T) -> Result<Self, TestAppError> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;

        let test_server = Arc::new(test_server);
        let handle = tokio::spawn({
            let server = Arc::clone(&test_server);
            async move {
                server.launch(listener).await;
            }
        });

        let TestServerConfig {
            api_client,
            min_backoff_delay,
            max_backoff_delay,
            backoff_jitter,
            max_retry_attempts,
        } = test_server.config();

        let client = api_client
            .unwrap_or_else(ApiClient::builder)
            .with_base_url(format!("http://{local_addr}"))
            .build();
        let client = match client {
            Ok(client) => client,
            Err(err) => {
                handle.abort();
                return Err(err.into());
            }
        };

        let mut backoff = ExponentialBuilder::default()
            .with_min_delay(min_backoff_delay)
            .with_max_delay(max_backoff_delay)
            .with_max_times(max_retry_attempts);
        if backoff_jitter {
            backoff = backoff.with_jitter();
        }

        if !Self::wait_for_health(&test_server, &client, local_addr, backoff).await {
            handle.abort();
            return Err(TestAppError::UnhealthyServer {
                attempts: max_retry_attempts,
                max_delay: max_backoff_delay,
            });
        }

        Ok(Self {
            local_addr,
            client,
            handle: Some(handle),
            test_server,
        })
    }

    async fn wait_for_health(
        test_server: &Arc<T>,
        client: &ApiClient,
        local_addr: SocketAddr,
        backoff: ExponentialBuilder,
    ) -> bool {
        let health_check = || {
            let server = Arc::clone(test_server);
            let client = client.clone();
            async move { Self::check_health(&server, &client, local_addr).await }
        };

        health_check
            .retry(backoff)
            .notify(|err, delay: Duration| {
                debug!(%err, ?delay, "waiting for the server");
            })
            .await
            .inspect_err(|err| error!(%err, %local_addr, "server never became healthy"))
            .is_ok()
    }

    async fn check_health(
        server: &T,
        client: &ApiClient,
        local_addr: SocketAddr,
    ) -> Result<(), std::io::Error> {
        match server.is_healthy(client).await {
            Some(true) => {
                debug!("🟢 server healthy");
                Ok(())
            }
            Some(false) => {
                debug!("🟠 server not yet healthy, retrying");
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "server not healthy yet",
                ))
            }
            None => tokio::net::TcpStream::connect(local_addr)
                .await
                .map(|_| debug!(%local_addr, "🟢 server accepts connections")),
        }
    }

    /// The address the server listens on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The server under test, e.g. to inspect its state.
    pub fn server(&self) -> &T {
        &self.test_server
    }

    /// A clone of the client, sharing its scope cache.
    pub fn client(&self) -> ApiClient {
        self.client.clone()
    }
}

impl<T> Drop for TestClient<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::net::TcpListener as TokioTcpListener;

    use super::*;
    use crate::ApiClientError;

    #[derive(Debug, Default)]
    struct MockServer {
        healthy_after: usize,
        checks: AtomicUsize,
    }

    impl TestServer for MockServer {
        async fn launch(&self, listener: TcpListener) {
            let Ok(()) = listener.set_nonblocking(true) else {
                return;
            };
            let Ok(listener) = TokioTcpListener::from_std(listener) else {
                return;
            };
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        }

        async fn is_healthy(&self, _client: &ApiClient) -> Option<bool> {
            let checks = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
            Some(checks > self.healthy_after)
        }

        fn config(&self) -> TestServerConfig {
            TestServerConfig {
                api_client: Some(ApiClient::builder().with_credentials("id", "secret")),
                min_backoff_delay: Duration::from_millis(1),
                max_backoff_delay: Duration::from_millis(5),
                backoff_jitter: false,
                max_retry_attempts: 3,
            }
        }
    }

    #[derive(Debug)]
    struct ConnectOnlyServer;

    impl TestServer for ConnectOnlyServer {
        async fn launch(&self, listener: TcpListener) {
            MockServer::default().launch(listener).await;
        }

        fn config(&self) -> TestServerConfig {
            TestServerConfig {
                api_client: Some(ApiClient::builder().with_credentials("id", "secret")),
                ..TestServerConfig::default()
            }
        }
    }

    #[tokio::test]
    async fn should_start_once_healthy() {
        let server = MockServer {
            healthy_after: 2,
            ..MockServer::default()
        };

        let client = TestClient::start(server).await.expect("server started");

        assert_eq!(client.server().checks.load(Ordering::SeqCst), 3);
        assert_eq!(
            client.base_url().as_str(),
            format!("http://{}/", client.local_addr())
        );
    }

    #[tokio::test]
    async fn should_fail_when_never_healthy() {
        let server = MockServer {
            healthy_after: usize::MAX,
            ..MockServer::default()
        };

        let result = TestClient::start(server).await;

        assert!(matches!(
            result,
            Err(TestAppError::UnhealthyServer { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn should_fall_back_to_tcp_check() {
        let client = TestClient::start(ConnectOnlyServer)
            .await
            .expect("server started");

        assert!(client.cached_scopes().await.is_empty());
    }

    #[derive(Debug)]
    struct NoCredentialsServer;

    impl TestServer for NoCredentialsServer {
        async fn launch(&self, _listener: TcpListener) {}
    }

    #[tokio::test]
    async fn should_require_credentials() {
        let result = TestClient::start(NoCredentialsServer).await;

        assert!(matches!(
            result,
            Err(TestAppError::ClientError(
                ApiClientError::MissingConfiguration { .. }
            ))
        ));
    }
}
