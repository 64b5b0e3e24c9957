#![allow(
    clippy::missing_errors_doc,
    dead_code,
    missing_docs,
    clippy::expect_used
)]
use std::io::Write;
use std::net::TcpListener;

use anyhow::Context;
use tempfile::NamedTempFile;
use tracing::info;

use userzip_client::ApiClient;
use userzip_client::test_client::{TestClient, TestServer, TestServerConfig};
pub use userzip_client::{Scope, StatusPolicy};

use userzip_server::{AppState, DEFAULT_ZIP_CODES, ServerConfig, launch};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";

#[derive(Clone)]
pub struct AppTestServer {
    state: AppState,
    status_policy: StatusPolicy,
}

impl TestServer for AppTestServer {
    async fn launch(&self, listener: TcpListener) {
        listener.set_nonblocking(true).expect("set non-blocking");
        let listener = tokio::net::TcpListener::from_std(listener).expect("valid listener");
        info!(?listener, "launching server");
        launch(listener, self.state.clone())
            .await
            .expect("server launched");
    }

    // Plain request: the health route needs no token
    async fn is_healthy(&self, client: &ApiClient) -> Option<bool> {
        let url = client.base_url().join("health").ok()?;
        let healthy = reqwest::get(url)
            .await
            .is_ok_and(|response| response.status().is_success());
        Some(healthy)
    }

    fn config(&self) -> TestServerConfig {
        let client = ApiClient::builder()
            .with_credentials(CLIENT_ID, CLIENT_SECRET)
            .with_status_policy(self.status_policy);

        TestServerConfig {
            api_client: Some(client),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for AppTestServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppTestServer")
            .field("status_policy", &self.status_policy)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, derive_more::Deref)]
pub struct TestApp {
    #[deref]
    client: TestClient<AppTestServer>,
}

impl TestApp {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(StatusPolicy::Return).await
    }

    pub async fn start_with(status_policy: StatusPolicy) -> anyhow::Result<Self> {
        let config =
            ServerConfig::new(CLIENT_ID, CLIENT_SECRET).with_zip_codes(DEFAULT_ZIP_CODES);
        let server = AppTestServer {
            state: AppState::new(config),
            status_policy,
        };
        let client = TestClient::start(server).await?;
        Ok(Self { client })
    }

    /// Number of tokens the server handed out so far
    pub async fn issued_tokens(&self) -> usize {
        self.client.server().state.issued_tokens().await
    }

    /// A client of the same server with other credentials
    pub fn client_with_credentials(&self, id: &str, secret: &str) -> anyhow::Result<ApiClient> {
        let client = ApiClient::builder()
            .with_base_url(format!("http://{}", self.client.local_addr()))
            .with_credentials(id, secret)
            .build()?;
        Ok(client)
    }
}

/// Writes `contents` in a temporary file, removed on drop
pub fn users_file(contents: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("create temporary file")?;
    file.write_all(contents.as_bytes())
        .context("write temporary file")?;
    Ok(file)
}
