//! POST body classification for window.open form submissions.
//!
//! For multipart forms the first chunk starts with the boundary notice,
//! something like `------WebKitFormBoundary12345678`. Anything else,
//! including an empty body, is treated as a `key=value` form.
//!
//! A url-encoded form whose first field name itself begins with `--` will
//! be misread as multipart; submitting such a form is not supported.
//!
//! # Example
//!
//! ```
//! use guest_window_broker::window::{ContentTypeFormat, PostDataChunk};
//!
//! let body = [PostDataChunk::new(b"--XYZ123\r\nContent-Disposition: form-data".to_vec())];
//! let format = ContentTypeFormat::classify(&body);
//!
//! assert_eq!(format.boundary.as_deref(), Some("XYZ123"));
//! assert_eq!(format.header_line(), "content-type: multipart/form-data; boundary=XYZ123");
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Content type of a multipart form body.
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Content type of a url-encoded form body.
pub const URL_ENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Leading boundary notice: two dashes, then a line that does not end in a dash.
static BOUNDARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--[^\r\n]*[^-\r\n]").expect("boundary pattern is valid")
});

// ============================================================================
// PostDataChunk
// ============================================================================

/// One raw chunk of an HTTP request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDataChunk {
    /// Raw bytes of the chunk.
    pub bytes: Vec<u8>,
}

impl PostDataChunk {
    /// Wraps raw bytes.
    #[inline]
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

// ============================================================================
// ContentTypeFormat
// ============================================================================

/// Content type inferred from a POST body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeFormat {
    /// Either [`MULTIPART_CONTENT_TYPE`] or [`URL_ENCODED_CONTENT_TYPE`].
    pub content_type: String,

    /// Multipart boundary without its leading dashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
}

impl ContentTypeFormat {
    /// Infers the content type of `post_data` from its first chunk.
    #[must_use]
    pub fn classify(post_data: &[PostDataChunk]) -> Self {
        let Some(first) = post_data.first() else {
            return Self::url_encoded();
        };

        let front = String::from_utf8_lossy(&first.bytes);
        match BOUNDARY_PATTERN.find(&front) {
            Some(notice) => Self::multipart(&notice.as_str()[2..]),
            None => Self::url_encoded(),
        }
    }

    /// A multipart format with the given boundary.
    #[must_use]
    pub fn multipart(boundary: impl Into<String>) -> Self {
        Self {
            content_type: MULTIPART_CONTENT_TYPE.to_string(),
            boundary: Some(boundary.into()),
        }
    }

    /// The url-encoded format.
    #[must_use]
    pub fn url_encoded() -> Self {
        Self {
            content_type: URL_ENCODED_CONTENT_TYPE.to_string(),
            boundary: None,
        }
    }

    /// Returns `true` for multipart bodies.
    #[inline]
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type == MULTIPART_CONTENT_TYPE
    }

    /// Renders the `content-type` header for the load request.
    #[must_use]
    pub fn header_line(&self) -> String {
        let header = format!("content-type: {};", self.content_type);
        match (&self.boundary, self.is_multipart()) {
            (Some(boundary), true) => format!("{header} boundary={boundary}"),
            _ => header,
        }
    }
}

// ============================================================================
// PostBody
// ============================================================================

/// POST body as reported to the new-window hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostBody {
    /// The untouched chunks.
    pub data: Vec<PostDataChunk>,

    /// Classification of `data`.
    #[serde(flatten)]
    pub format: ContentTypeFormat,
}

impl PostBody {
    /// Classifies `data` and packages it.
    #[must_use]
    pub fn new(data: Vec<PostDataChunk>) -> Self {
        let format = ContentTypeFormat::classify(&data);
        Self { data, format }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn chunk(text: &str) -> PostDataChunk {
        PostDataChunk::new(text.as_bytes().to_vec())
    }

    #[test]
    fn test_empty_body_is_url_encoded() {
        let format = ContentTypeFormat::classify(&[]);
        assert_eq!(format.content_type, URL_ENCODED_CONTENT_TYPE);
        assert!(format.boundary.is_none());
    }

    #[test]
    fn test_boundary_detected() {
        let format = ContentTypeFormat::classify(&[chunk("--XYZ123\r\nContent-Disposition")]);
        assert_eq!(format, ContentTypeFormat::multipart("XYZ123"));
    }

    #[test]
    fn test_webkit_boundary() {
        let format = ContentTypeFormat::classify(&[
            chunk("------WebKitFormBoundary12345678\r\n"),
            chunk("ignored"),
        ]);
        assert_eq!(
            format.boundary.as_deref(),
            Some("----WebKitFormBoundary12345678")
        );
    }

    #[test]
    fn test_trailing_dashes_excluded() {
        let format = ContentTypeFormat::classify(&[chunk("--abc--\n")]);
        assert_eq!(format.boundary.as_deref(), Some("abc"));
    }

    #[test]
    fn test_boundary_stops_at_carriage_return() {
        let format = ContentTypeFormat::classify(&[chunk("--abc\rdef\n")]);
        assert_eq!(format.boundary.as_deref(), Some("abc"));
    }

    #[test]
    fn test_only_dashes_is_url_encoded() {
        assert!(!ContentTypeFormat::classify(&[chunk("----\r\n")]).is_multipart());
        assert!(!ContentTypeFormat::classify(&[chunk("--")]).is_multipart());
    }

    #[test]
    fn test_key_value_body_is_url_encoded() {
        let format = ContentTypeFormat::classify(&[chunk("name=value&other=1")]);
        assert_eq!(format, ContentTypeFormat::url_encoded());
    }

    #[test]
    fn test_boundary_must_start_body() {
        let format = ContentTypeFormat::classify(&[chunk("x\n--XYZ")]);
        assert!(!format.is_multipart());
    }

    #[test]
    fn test_non_utf8_first_chunk() {
        let format = ContentTypeFormat::classify(&[PostDataChunk::new(vec![0xff, 0xfe, b'a'])]);
        assert!(!format.is_multipart());
    }

    #[test]
    fn test_header_line() {
        assert_eq!(
            ContentTypeFormat::url_encoded().header_line(),
            "content-type: application/x-www-form-urlencoded;"
        );
        assert_eq!(
            ContentTypeFormat::multipart("B").header_line(),
            "content-type: multipart/form-data; boundary=B"
        );
    }

    #[test]
    fn test_post_body_serializes_flat() {
        let body = PostBody::new(vec![chunk("a=1")]);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contentType"], json!(URL_ENCODED_CONTENT_TYPE));
        assert!(value.get("boundary").is_none());
        assert!(value["data"].is_array());
    }
}
