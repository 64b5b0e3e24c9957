use axum::extract::{FromRequest, Multipart, Request};

use crate::errors::ApiError;

/// A file part of a `multipart/form-data` body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub part: String,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// Custom extractor collecting the file parts of a multipart body
///
/// Text fields are skipped.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    pub files: Vec<UploadedFile>,
}

impl MultipartUpload {
    /// Takes the file sent as `part`
    pub fn take_file(&mut self, part: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|file| file.part == part)?;
        Some(self.files.swap_remove(index))
    }
}

impl<S> FromRequest<S> for MultipartUpload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        let mut files = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| ApiError::bad_request(format!("Failed to read field: {err}")))?
        {
            let part = field.name().unwrap_or("unknown").to_string();
            let file_name = field.file_name().map(ToString::to_string);
            if file_name.is_none() {
                continue;
            }

            let data = field.bytes().await.map_err(|err| {
                ApiError::bad_request(format!("Failed to read part '{part}': {err}"))
            })?;
            files.push(UploadedFile {
                part,
                file_name,
                data: data.to_vec(),
            });
        }

        Ok(Self { files })
    }
}
