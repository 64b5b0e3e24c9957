#![allow(missing_docs)]
use std::net::SocketAddr;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::info;

mod auth;
mod errors;
mod extractors;
mod routes;
mod state;
mod zip_codes;

pub mod users;

pub use self::errors::{ApiError, ApiErrorResponse};
pub use self::routes::app_router;
pub use self::state::{AppState, ServerConfig};

/// Zip codes available when no other list is configured
pub const DEFAULT_ZIP_CODES: [&str; 5] = ["12345", "23456", "34567", "45678", "56789"];

/// Launch the server
///
/// # Errors
///
/// fail if the socket cannot be created (e.g. port already used)
/// fail if the server cannot be launch
pub async fn run(addr: SocketAddr, config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("opening {addr}"))?;
    info!("Using address {addr}");

    launch(listener, AppState::new(config)).await
}

/// Launch the server with an existing state
///
/// # Errors
///
/// fail if the server cannot be launch
pub async fn launch(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = app_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    axum::serve(listener, app.into_make_service())
        .await
        .context("starting server")?;

    Ok(())
}
