use http::Method;
use tracing::info;

use crate::{ApiClient, ApiClientError, ApiResponse, Scope};

/// Path of the zip-codes resource.
pub const ZIP_CODES_PATH: &str = "zip-codes";
/// Path of the zip-codes expansion endpoint.
pub const EXPAND_ZIP_CODES_PATH: &str = "zip-codes/expand";

impl ApiClient {
    /// `POST /zip-codes/expand` with `zip_codes` as a JSON array.
    ///
    /// Codes already known by the server are ignored by it, so the call is
    /// idempotent.
    ///
    /// # Errors
    ///
    /// Fails on authentication or transport errors, and on non-success
    /// statuses under [`StatusPolicy::Raise`](crate::StatusPolicy::Raise).
    pub async fn expand_zip_codes<Z>(
        &self,
        scope: &Scope,
        zip_codes: &[Z],
    ) -> Result<ApiResponse, ApiClientError>
    where
        Z: AsRef<str>,
    {
        let zip_codes = zip_codes.iter().map(AsRef::as_ref).collect::<Vec<_>>();
        info!(%scope, ?zip_codes, "expanding zip codes");

        self.scoped(scope)
            .await
            .send_json(Method::POST, EXPAND_ZIP_CODES_PATH, "zipCodes", &zip_codes)
            .await
    }

    /// `GET /zip-codes`: the zip codes available for new users.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::expand_zip_codes`].
    pub async fn get_zip_codes(&self, scope: &Scope) -> Result<ApiResponse, ApiClientError> {
        self.scoped(scope)
            .await
            .get(ZIP_CODES_PATH, &[] as &[(&str, &str)])
            .await
    }
}
