use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Form, Json, Router};
use headers::authorization::{Basic, Bearer};
use headers::{Authorization, HeaderMapExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::AppState;
use crate::errors::ApiError;
use crate::state::ServerConfig;

pub(crate) fn auth_router() -> Router<AppState> {
    Router::new().route("/oauth/token", post(issue_token))
}

/// Issued bearer tokens and their scopes
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenStore {
    tokens: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl TokenStore {
    async fn issue(&self, scope: &str) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let scopes = scope.split_whitespace().map(ToString::to_string).collect();
        self.tokens.write().await.insert(token.clone(), scopes);
        token
    }

    async fn grants(&self, token: &str, scope: &str) -> Option<bool> {
        let tokens = self.tokens.read().await;
        let scopes = tokens.get(token)?;
        Some(scopes.iter().any(|it| it == scope))
    }

    pub(crate) async fn issued(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    grant_type: String,
    #[serde(default)]
    scope: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token_type: &'static str,
    access_token: String,
    scope: String,
}

#[derive(Debug, derive_more::Display)]
enum TokenError {
    #[display("invalid_client")]
    InvalidClient,
    #[display("unsupported_grant_type")]
    UnsupportedGrantType,
}

impl IntoResponse for TokenError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            Self::InvalidClient => StatusCode::UNAUTHORIZED,
            Self::UnsupportedGrantType => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn issue_token(
    State(config): State<Arc<ServerConfig>>,
    State(tokens): State<TokenStore>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, TokenError> {
    let Some(Authorization(basic)) = headers.typed_get::<Authorization<Basic>>() else {
        warn!("token request without client credentials");
        return Err(TokenError::InvalidClient);
    };
    if basic.username() != config.client_id || basic.password() != config.client_secret {
        warn!(client_id = basic.username(), "unknown client");
        return Err(TokenError::InvalidClient);
    }
    if request.grant_type != "client_credentials" {
        return Err(TokenError::UnsupportedGrantType);
    }

    let access_token = tokens.issue(&request.scope).await;
    info!(client_id = basic.username(), scope = request.scope.as_str(), "token issued");

    Ok(Json(TokenResponse {
        token_type: "Bearer",
        access_token,
        scope: request.scope,
    }))
}

/// A scope a route requires
pub(crate) trait RequiredScope {
    const SCOPE: &'static str;
}

pub(crate) struct ReadScope;

impl RequiredScope for ReadScope {
    const SCOPE: &'static str = "read";
}

pub(crate) struct WriteScope;

impl RequiredScope for WriteScope {
    const SCOPE: &'static str = "write";
}

/// Extractor rejecting requests whose bearer token does not grant `S`
pub(crate) struct Granted<S>(PhantomData<S>);

impl<S> FromRequestParts<AppState> for Granted<S>
where
    S: RequiredScope + Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(Authorization(bearer)) = parts.headers.typed_get::<Authorization<Bearer>>() else {
            return Err(ApiError::Unauthorized);
        };

        let tokens = TokenStore::from_ref(state);
        match tokens.grants(bearer.token(), S::SCOPE).await {
            Some(true) => Ok(Self(PhantomData)),
            Some(false) => Err(ApiError::Forbidden { scope: S::SCOPE }),
            None => Err(ApiError::Unauthorized),
        }
    }
}
