//! # userzip client
//!
//! Client of the users and zip-codes REST API, authenticated with the OAuth2
//! client-credentials grant.
//!
//! - **[`ApiClient`]**: typed operations on users and zip codes; every call
//!   names the scope it runs with
//! - **[`ScopedClient`]**: the per-scope client, holding the scope's token
//! - **[`Authenticator`]**: fetches a token on first need and caches it
//! - **[`TestClient`](test_client::TestClient)**: starts a server under test
//!   on a random port and points a client at it
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use userzip_client::{ApiClient, Scope, Sex, User, UserFilter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::builder()
//!     .with_base_url("http://localhost:8080")
//!     .with_credentials("client-id", "client-secret")
//!     .build()?;
//!
//! // One token per scope, fetched lazily and cached
//! client.expand_zip_codes(&Scope::write(), &["75001"]).await?;
//!
//! let alice = User::new("Alice", Sex::Female).with_age(31).with_zip_code("75001");
//! let created = client.create_user(&Scope::write(), &alice).await?;
//! assert_eq!(created.status(), 201);
//!
//! let women = client
//!     .get_users(&Scope::read(), &[UserFilter::Sex(Sex::Female)])
//!     .await?;
//! assert!(women.contains("Alice"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error statuses
//!
//! By default a non-success status is returned as an [`ApiResponse`] so tests
//! can assert on it. With [`StatusPolicy::Raise`] it becomes an
//! [`ApiClientError::RemoteError`] carrying the status and the body.
//!
//! ## Process-wide instance
//!
//! [`initialize`] and [`instance`] wrap a write-once global client:
//!
//! ```rust,no_run
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! userzip_client::initialize("http://localhost:8080", "client-id", "client-secret")?;
//! let client = userzip_client::instance()?;
//! # Ok(())
//! # }
//! ```

mod client;

mod global;
pub use self::global::{initialize, instance};

mod model;
pub use self::model::{Sex, UpdateMethod, User, UserFilter, UserUpdate};

mod users;
pub use self::users::{UPLOAD_USERS_PATH, USERS_PATH};

mod zip_codes;
pub use self::zip_codes::{EXPAND_ZIP_CODES_PATH, ZIP_CODES_PATH};

pub mod test_client;

pub use self::client::{
    ApiClient, ApiClientBuilder, ApiClientError, ApiResponse, Authentication,
    AuthenticationError, Authenticator, CallBody, Credentials, ENV_BASE_URL, ENV_CLIENT_ID,
    ENV_CLIENT_SECRET, ENV_STATUS_POLICY, OAuth2Token, Scope, ScopedClient, SecureString,
    StatusPolicy, TOKEN_PATH, TokenCache,
};
