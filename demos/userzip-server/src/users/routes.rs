use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use super::domain::{UpdateMode, User, UserPayload, UserQuery, UserUpdate};
use super::repository::Directory;
use crate::AppState;
use crate::auth::{Granted, ReadScope, WriteScope};
use crate::errors::ApiError;
use crate::extractors::MultipartUpload;

pub(crate) fn user_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users)
                .post(create_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .route("/upload", post(upload_users))
}

async fn list_users(
    _: Granted<ReadScope>,
    State(directory): State<Directory>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    Json(directory.list_users(&query).await)
}

async fn create_user(
    _: Granted<WriteScope>,
    State(directory): State<Directory>,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = User::try_from(payload)?;
    let created = directory.create_user(user).await?;
    info!(name = created.name.as_str(), "user created");

    Ok((StatusCode::CREATED, Json(created)))
}

async fn replace_user(
    _: Granted<WriteScope>,
    State(directory): State<Directory>,
    Json(update): Json<UserUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    update_user(&directory, update, UpdateMode::Replace).await
}

async fn patch_user(
    _: Granted<WriteScope>,
    State(directory): State<Directory>,
    Json(update): Json<UserUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    update_user(&directory, update, UpdateMode::Merge).await
}

async fn update_user(
    directory: &Directory,
    update: UserUpdate,
    mode: UpdateMode,
) -> Result<Json<User>, ApiError> {
    let UserUpdate {
        user_new_values,
        user_to_change,
    } = update;
    let new_values = User::try_from(user_new_values)?;
    let target = User::try_from(user_to_change)?;

    let updated = directory.update_user(&target, new_values, mode).await?;
    info!(from = target.name.as_str(), to = updated.name.as_str(), ?mode, "user updated");

    Ok(Json(updated))
}

async fn delete_user(
    _: Granted<WriteScope>,
    State(directory): State<Directory>,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let target = User::try_from(payload)?;
    let removed = directory.delete_user(&target).await?;
    info!(name = removed.name.as_str(), "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn upload_users(
    _: Granted<WriteScope>,
    State(directory): State<Directory>,
    mut upload: MultipartUpload,
) -> Result<impl IntoResponse, ApiError> {
    let Some(file) = upload.take_file("file") else {
        return Err(ApiError::bad_request("missing 'file' part"));
    };

    let payloads = serde_json::from_slice::<Vec<UserPayload>>(&file.data).map_err(|err| {
        ApiError::bad_request(format!(
            "'{}' is not a JSON array of users: {err}",
            file.file_name.as_deref().unwrap_or("file")
        ))
    })?;
    let users = payloads
        .into_iter()
        .map(User::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let created = directory.create_users(users).await?;
    info!(created, file_name = ?file.file_name, "users uploaded");

    Ok((StatusCode::CREATED, Json(json!({ "created": created }))))
}
