use std::borrow::Borrow;

/// An OAuth2 authorization scope, e.g. `read` or `write`.
///
/// The scope decides which token the client requests. An empty scope is
/// accepted and forwarded as-is to the token endpoint.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    derive_more::Display,
    derive_more::From,
    derive_more::Deref,
)]
#[display("{_0}")]
pub struct Scope(String);

impl Scope {
    /// Read-only access to users and zip codes.
    pub const READ: &str = "read";
    /// Create, update and delete access.
    pub const WRITE: &str = "write";

    /// Creates a scope.
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    /// The `read` scope.
    pub fn read() -> Self {
        Self::new(Self::READ)
    }

    /// The `write` scope.
    pub fn write() -> Self {
        Self::new(Self::WRITE)
    }

    /// The scope as sent to the token endpoint.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&Scope> for Scope {
    fn from(value: &Scope) -> Self {
        value.clone()
    }
}

impl Borrow<str> for Scope {
    fn borrow(&self) -> &str {
        &self.0
    }
}
