use std::path::Path;
use std::sync::Arc;

use headers::HeaderMapExt;
use http::Method;
use http::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Body, Request};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use super::{ApiClientError, ApiResponse, Authenticator, CallBody, Credentials, Scope, StatusPolicy};

/// An HTTP client bound to one authorization scope.
///
/// Every request carries the `Authorization` header produced by the scope's
/// [`Authenticator`]; the token is fetched on first request and reused
/// afterwards. Clones share the authenticator, hence the token.
#[derive(Debug, Clone)]
pub struct ScopedClient {
    inner: Arc<ScopedInner>,
}

#[derive(Debug)]
struct ScopedInner {
    client: reqwest::Client,
    base_url: Url,
    authenticator: Authenticator,
    status_policy: StatusPolicy,
}

impl ScopedClient {
    pub(super) fn new(
        client: reqwest::Client,
        credentials: Arc<Credentials>,
        scope: Scope,
        status_policy: StatusPolicy,
    ) -> Self {
        let base_url = credentials.base_url().clone();
        let authenticator = Authenticator::new(client.clone(), credentials, scope);
        Self {
            inner: Arc::new(ScopedInner {
                client,
                base_url,
                authenticator,
                status_policy,
            }),
        }
    }

    /// The scope this client is bound to.
    pub fn scope(&self) -> &Scope {
        self.inner.authenticator.scope()
    }

    /// The authenticator of this scope.
    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.authenticator
    }

    /// The policy applied to non-success statuses.
    pub fn status_policy(&self) -> StatusPolicy {
        self.inner.status_policy
    }

    /// Whether both clients share the same authenticator.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Sends a `GET` request with the given query parameters.
    ///
    /// # Errors
    ///
    /// Fails on authentication or transport errors, and on non-success
    /// statuses under [`StatusPolicy::Raise`].
    pub async fn get<Q>(&self, path: &str, query: &Q) -> Result<ApiResponse, ApiClientError>
    where
        Q: Serialize + ?Sized,
    {
        let mut url = self.endpoint(path)?;
        let query = serde_urlencoded::to_string(query).map_err(|err| {
            ApiClientError::InvalidArgument {
                name: "query",
                reason: err.to_string(),
            }
        })?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }

        self.exchange(Method::GET, url, None).await
    }

    /// Sends `payload` as a JSON body.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::InvalidArgument`] before any request when
    /// the payload is absent; otherwise as [`ScopedClient::get`].
    pub async fn send_json<T>(
        &self,
        method: Method,
        path: &str,
        name: &'static str,
        payload: &T,
    ) -> Result<ApiResponse, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let body = CallBody::json(name, payload)?;
        let url = self.endpoint(path)?;

        self.exchange(method, url, Some(body)).await
    }

    /// Uploads `file` as the `file` part of a `multipart/form-data` body.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::InvalidArgument`] before any request when
    /// the file does not exist, with [`ApiClientError::File`] when it cannot
    /// be read; otherwise as [`ScopedClient::get`].
    pub async fn upload_file(
        &self,
        path: &str,
        file: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiClientError> {
        let file = file.as_ref();
        if !tokio::fs::try_exists(file).await.unwrap_or(false) {
            return Err(ApiClientError::InvalidArgument {
                name: "file",
                reason: format!("'{}' does not exist", file.display()),
            });
        }

        let content = tokio::fs::read(file)
            .await
            .map_err(|error| ApiClientError::File {
                path: file.to_path_buf(),
                error,
            })?;
        let file_name = file
            .file_name()
            .map_or_else(|| "upload".into(), |name| name.to_string_lossy());

        let body = CallBody::multipart_file("file", &file_name, &content)?;
        let url = self.endpoint(path)?;

        self.exchange(Method::POST, url, Some(body)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiClientError> {
        let relative = path.trim_start_matches('/');
        self.inner
            .base_url
            .join(relative)
            .map_err(|err| ApiClientError::InvalidArgument {
                name: "path",
                reason: format!("cannot join '{path}' to the base URL: {err}"),
            })
    }

    async fn exchange(
        &self,
        method: Method,
        url: Url,
        body: Option<CallBody>,
    ) -> Result<ApiResponse, ApiClientError> {
        let auth_header = self.inner.authenticator.auth_header().await?;

        let mut request = Request::new(method, url);
        let req_headers = request.headers_mut();
        req_headers.insert(AUTHORIZATION, auth_header);
        req_headers.insert(ACCEPT, http::HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            req_headers.typed_insert(body.content_type);
            *request.body_mut() = Some(Body::from(body.data));
        }

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(scope = %self.scope(), %method, %url, "sending request...");

        let response = self.inner.client.execute(request).await?;
        let response = ApiResponse::from_reqwest(response).await?;
        debug!(
            scope = %self.scope(),
            %method,
            %url,
            status = %response.status(),
            body = response.body(),
            "...response received"
        );

        match self.inner.status_policy {
            StatusPolicy::Return => Ok(response),
            StatusPolicy::Raise => response.error_for_status().inspect_err(|err| {
                warn!(scope = %self.scope(), %method, %url, %err, "remote error");
            }),
        }
    }
}
