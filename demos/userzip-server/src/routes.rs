use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;
use crate::auth::auth_router;
use crate::users::routes::user_router;
use crate::zip_codes::zip_code_router;

/// The application router
pub fn app_router() -> Router<AppState> {
    Router::new()
        .merge(auth_router())
        .nest("/users", user_router())
        .nest("/zip-codes", zip_code_router())
        .route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.uptime();

    Json(json!({
        "status": "OK",
        "uptime": uptime,
    }))
}
