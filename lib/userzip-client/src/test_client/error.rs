//! Error types for the test client harness.

use std::time::Duration;

use crate::ApiClientError;

/// Errors raised while starting a server under test.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TestAppError {
    /// Binding or inspecting the listener failed.
    #[display("I/O error: {_0}")]
    IoError(tokio::io::Error),

    /// The API client could not be built.
    #[display("API client error: {_0}")]
    ClientError(ApiClientError),

    /// The server never reported itself healthy.
    #[from(ignore)]
    #[display("Server failed to become healthy after {attempts} attempts (max delay {max_delay:?})")]
    UnhealthyServer {
        /// Number of health checks performed.
        attempts: usize,
        /// The longest delay between two checks.
        max_delay: Duration,
    },
}
