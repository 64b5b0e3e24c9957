//! Token acquisition with the client-credentials grant.

use headers::{ContentType, HeaderMapExt};
use http::header::{ACCEPT, AUTHORIZATION};
use http::{HeaderValue, Method};
use reqwest::{Body, Request};
use tracing::{debug, info, warn};

use super::error::AuthenticationError;
use super::token::{OAuth2Token, TokenResponse};
use super::Authenticator;
use crate::client::Authentication;

impl Authenticator {
    /// Returns the `Authorization` header value, fetching a token on first call.
    ///
    /// Later calls reuse the cached token without any network call.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the token endpoint cannot be reached
    /// - the token endpoint answers with a non-success status
    /// - the response is not a `{token_type, access_token}` document
    pub async fn auth_header(&self) -> Result<HeaderValue, AuthenticationError> {
        let token = self
            .cache
            .get_or_try_fetch(|| self.request_token())
            .await?;

        Authentication::Token(token.authorization()).to_header()
    }

    async fn request_token(&self) -> Result<OAuth2Token, AuthenticationError> {
        let url = self.credentials.token_url()?;
        let basic = Authentication::Basic {
            username: self.credentials.client_id().to_string(),
            password: self.credentials.client_secret().clone(),
        }
        .to_header()?;

        let form = serde_urlencoded::to_string([
            ("grant_type", "client_credentials"),
            ("scope", self.scope.as_str()),
        ])
        .map_err(|err| AuthenticationError::TokenRequestFailed {
            reason: format!("cannot encode token request: {err}"),
        })?;

        let mut request = Request::new(Method::POST, url);
        let req_headers = request.headers_mut();
        req_headers.insert(AUTHORIZATION, basic);
        req_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        req_headers.typed_insert(ContentType::form_url_encoded());
        *request.body_mut() = Some(Body::from(form));

        debug!(scope = %self.scope, url = %request.url(), "requesting token...");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| AuthenticationError::TokenRequestFailed {
                reason: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AuthenticationError::TokenRequestFailed {
                reason: format!("cannot read token response: {err}"),
            })?;

        if !status.is_success() {
            warn!(scope = %self.scope, %status, "token request rejected");
            return Err(AuthenticationError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = serde_json::from_str::<TokenResponse>(&body)
            .map(OAuth2Token::from)
            .map_err(|err| AuthenticationError::InvalidTokenResponse {
                reason: err.to_string(),
            })?;

        info!(scope = %self.scope, token_type = token.token_type(), "...token acquired");
        Ok(token)
    }
}
