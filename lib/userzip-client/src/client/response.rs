use http::StatusCode;
use serde::de::DeserializeOwned;

use super::ApiClientError;

/// The raw outcome of a call to a domain endpoint.
///
/// Under [`StatusPolicy::Return`](super::StatusPolicy::Return) non-success
/// statuses are returned here as well, so tests can assert on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
}

impl ApiResponse {
    /// Creates a response.
    pub fn new(status: StatusCode, content_type: Option<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub(super) async fn from_reqwest(response: reqwest::Response) -> Result<Self, ApiClientError> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = response.text().await?;

        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `Content-Type` header, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The response body as text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the body contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Json`] if the body is not a valid `T`.
    pub fn as_json<T>(&self) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let result = serde_json::from_str(&self.body)?;
        Ok(result)
    }

    /// Turns a non-success response into [`ApiClientError::RemoteError`].
    ///
    /// # Errors
    ///
    /// Returns the error when the status is not in the `2xx` range.
    pub fn error_for_status(self) -> Result<Self, ApiClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiClientError::RemoteError {
                status: self.status,
                body: self.body,
            })
        }
    }
}
