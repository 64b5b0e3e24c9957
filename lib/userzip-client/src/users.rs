use std::path::Path;

use http::Method;
use tracing::{info, warn};

use crate::{
    ApiClient, ApiClientError, ApiResponse, Scope, UpdateMethod, User, UserFilter, UserUpdate,
};

/// Path of the users resource.
pub const USERS_PATH: &str = "users";
/// Path of the users file upload endpoint.
pub const UPLOAD_USERS_PATH: &str = "users/upload";

impl ApiClient {
    /// `POST /users` with `user` as JSON body.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::InvalidArgument`] before any request when
    /// `user` is `None`. Also fails on authentication or transport errors, and
    /// on non-success statuses under [`StatusPolicy::Raise`](crate::StatusPolicy::Raise).
    pub async fn create_user(
        &self,
        scope: &Scope,
        user: impl Into<Option<&User>>,
    ) -> Result<ApiResponse, ApiClientError> {
        let user = user.into();
        info!(%scope, name = ?user.and_then(|it| it.name.as_deref()), "creating user");
        self.scoped(scope)
            .await
            .send_json(Method::POST, USERS_PATH, "user", &user)
            .await
    }

    /// Creates every user in turn with [`ApiClient::create_user`].
    ///
    /// Not atomic: the first error stops the loop and the users created
    /// before it stay on the server.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::create_user`].
    pub async fn create_users(
        &self,
        scope: &Scope,
        users: &[User],
    ) -> Result<Vec<ApiResponse>, ApiClientError> {
        let mut responses = Vec::with_capacity(users.len());
        for user in users {
            let response = self.create_user(scope, user).await.inspect_err(|err| {
                warn!(%scope, created = responses.len(), %err, "bulk creation interrupted");
            })?;
            responses.push(response);
        }
        Ok(responses)
    }

    /// `GET /users`, with `filters` as query parameters.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::create_user`].
    pub async fn get_users(
        &self,
        scope: &Scope,
        filters: &[UserFilter],
    ) -> Result<ApiResponse, ApiClientError> {
        let query = filters.iter().map(UserFilter::to_pair).collect::<Vec<_>>();
        self.scoped(scope).await.get(USERS_PATH, &query).await
    }

    /// `PATCH` or `PUT /users` with the update as JSON body.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::create_user`], `None` being an invalid argument.
    pub async fn update_user(
        &self,
        scope: &Scope,
        method: UpdateMethod,
        update: impl Into<Option<&UserUpdate>>,
    ) -> Result<ApiResponse, ApiClientError> {
        let update = update.into();
        info!(
            %scope,
            %method,
            target = ?update.and_then(|it| it.user_to_change.name.as_deref()),
            "updating user"
        );
        self.scoped(scope)
            .await
            .send_json(method.into(), USERS_PATH, "update", &update)
            .await
    }

    /// `DELETE /users` with the user selector as JSON body.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::create_user`], `None` being an invalid argument.
    pub async fn delete_user(
        &self,
        scope: &Scope,
        user: impl Into<Option<&User>>,
    ) -> Result<ApiResponse, ApiClientError> {
        let user = user.into();
        info!(%scope, name = ?user.and_then(|it| it.name.as_deref()), "deleting user");
        self.scoped(scope)
            .await
            .send_json(Method::DELETE, USERS_PATH, "user", &user)
            .await
    }

    /// `POST /users/upload` with the file as the `file` multipart part.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::InvalidArgument`] when the file does not
    /// exist; otherwise as [`ApiClient::create_user`].
    pub async fn upload_users_file(
        &self,
        scope: &Scope,
        file: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiClientError> {
        let file = file.as_ref();
        info!(%scope, file = %file.display(), "uploading users file");
        self.scoped(scope)
            .await
            .upload_file(UPLOAD_USERS_PATH, file)
            .await
    }
}
