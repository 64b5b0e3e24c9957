use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::AppState;
use crate::auth::{Granted, ReadScope, WriteScope};
use crate::users::repository::Directory;

pub(crate) fn zip_code_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_zip_codes))
        .route("/expand", post(expand_zip_codes))
}

async fn list_zip_codes(
    _: Granted<ReadScope>,
    State(directory): State<Directory>,
) -> impl IntoResponse {
    Json(directory.zip_codes().await)
}

async fn expand_zip_codes(
    _: Granted<WriteScope>,
    State(directory): State<Directory>,
    Json(zip_codes): Json<Vec<String>>,
) -> impl IntoResponse {
    let requested = zip_codes.len();
    let available = directory.expand_zip_codes(zip_codes).await;
    info!(requested, available = available.len(), "zip codes expanded");

    (StatusCode::CREATED, Json(available))
}
