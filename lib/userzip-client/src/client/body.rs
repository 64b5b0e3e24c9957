use headers::ContentType;
use serde::Serialize;

use super::ApiClientError;

/// The body of an outgoing request together with its content type.
#[derive(Clone, derive_more::Debug)]
pub struct CallBody {
    pub(super) content_type: ContentType,
    #[debug(ignore)]
    pub(super) data: Vec<u8>,
}

impl CallBody {
    /// Creates a JSON body from a serializable value.
    ///
    /// `name` identifies the argument in the error raised when the value
    /// serializes to `null`, i.e. when the payload is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::InvalidArgument`] for an absent payload and
    /// [`ApiClientError::Json`] if serialization fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use userzip_client::CallBody;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let body = CallBody::json("zipCodes", &["75001", "75002"])?;
    ///
    /// let absent: Option<String> = None;
    /// assert!(CallBody::json("user", &absent).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn json<T>(name: &'static str, payload: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(payload)?;
        if value.is_null() {
            return Err(ApiClientError::InvalidArgument {
                name,
                reason: "payload is absent".to_string(),
            });
        }

        let data = serde_json::to_vec(&value)?;
        Ok(Self {
            content_type: ContentType::json(),
            data,
        })
    }

    /// Creates a `multipart/form-data` body holding a single file part.
    ///
    /// The boundary is generated and carried by the content type. Quotes and
    /// line breaks in `part` and `file_name` are percent-encoded so they
    /// cannot break the part header.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::InvalidArgument`] if the content type cannot
    /// be built.
    pub fn multipart_file(
        part: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<Self, ApiClientError> {
        let boundary = format!("----formdata-userzip-{}", uuid::Uuid::new_v4());
        let part = escape_header_param(part);
        let file_name = escape_header_param(file_name);

        let mut data = Vec::with_capacity(content.len() + 256);
        data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        data.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{part}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        data.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        data.extend_from_slice(content);
        data.extend_from_slice(b"\r\n");
        data.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        let mime = format!("multipart/form-data; boundary={boundary}")
            .parse::<mime::Mime>()
            .map_err(|err| ApiClientError::InvalidArgument {
                name: "boundary",
                reason: err.to_string(),
            })?;

        Ok(Self {
            content_type: ContentType::from(mime),
            data,
        })
    }

    /// The content type sent with this body.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Encodes `"`, CR and LF the way browsers do in `Content-Disposition` values.
fn escape_header_param(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
