//! Request and Response message types.
//!
//! Defines the envelope for calls arriving from a rendering context over the
//! message bridge, and the reply the broker sends back.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

// ============================================================================
// Channel
// ============================================================================

/// Inbound bridge channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Raw `window.open` from a rendering context.
    #[serde(rename = "GUEST_WINDOW_MANAGER_WINDOW_OPEN")]
    WindowOpen,
    /// Allow-listed window control.
    #[serde(rename = "GUEST_WINDOW_MANAGER_WINDOW_METHOD")]
    WindowMethod,
    /// Cross-window message.
    #[serde(rename = "GUEST_WINDOW_MANAGER_WINDOW_POSTMESSAGE")]
    WindowPostMessage,
    /// Allow-listed contents method with a deferred result.
    #[serde(rename = "GUEST_WINDOW_MANAGER_WEB_CONTENTS_METHOD_ASYNC")]
    ContentsMethodAsync,
    /// Allow-listed contents method with an immediate result.
    #[serde(rename = "GUEST_WINDOW_MANAGER_WEB_CONTENTS_METHOD_SYNC")]
    ContentsMethodSync,
}

impl Channel {
    /// Wire name of the channel.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::WindowOpen => "GUEST_WINDOW_MANAGER_WINDOW_OPEN",
            Self::WindowMethod => "GUEST_WINDOW_MANAGER_WINDOW_METHOD",
            Self::WindowPostMessage => "GUEST_WINDOW_MANAGER_WINDOW_POSTMESSAGE",
            Self::ContentsMethodAsync => "GUEST_WINDOW_MANAGER_WEB_CONTENTS_METHOD_ASYNC",
            Self::ContentsMethodSync => "GUEST_WINDOW_MANAGER_WEB_CONTENTS_METHOD_SYNC",
        }
    }

    /// Returns `true` if the caller blocks until the reply.
    #[inline]
    #[must_use]
    pub fn is_sync(self) -> bool {
        matches!(self, Self::WindowOpen | Self::ContentsMethodSync)
    }
}

// ============================================================================
// Request
// ============================================================================

/// A call from a rendering context to the broker.
///
/// # Format
///
/// ```json
/// {
///   "id": "uuid",
///   "channel": "GUEST_WINDOW_MANAGER_WINDOW_METHOD",
///   "args": [12, "focus"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Unique identifier for request/response correlation.
    pub id: RequestId,

    /// Channel the call arrived on.
    pub channel: Channel,

    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Request {
    /// Creates a new request with auto-generated ID.
    #[inline]
    #[must_use]
    pub fn new(channel: Channel, args: Vec<Value>) -> Self {
        Self {
            id: RequestId::generate(),
            channel,
            args,
        }
    }

    /// Creates a new request with specific ID.
    #[inline]
    #[must_use]
    pub fn with_id(id: RequestId, channel: Channel, args: Vec<Value>) -> Self {
        Self { id, channel, args }
    }

    /// Decodes a request from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for text that is not a request, including an
    /// unknown channel name.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// ============================================================================
// Response
// ============================================================================

/// The broker's reply to a [`Request`].
///
/// # Format
///
/// Success:
/// ```json
/// {
///   "id": "uuid",
///   "type": "success",
///   "result": 12
/// }
/// ```
///
/// Error:
/// ```json
/// {
///   "id": "uuid",
///   "type": "error",
///   "error": "policy violation",
///   "message": "Access denied to guestId: 12"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Response type.
    #[serde(rename = "type")]
    pub response_type: ResponseType,

    /// Result data (if success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error code (if error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Error message (if error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// Creates a success response.
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            id,
            response_type: ResponseType::Success,
            result: Some(result),
            error: None,
            message: None,
        }
    }

    /// Creates an error response from a broker error.
    #[must_use]
    pub fn failure(id: RequestId, error: &Error) -> Self {
        Self {
            id,
            response_type: ResponseType::Error,
            result: None,
            error: Some(error.code().to_string()),
            message: Some(error.to_string()),
        }
    }

    /// Builds the reply for `id` from a handler outcome.
    #[must_use]
    pub fn from_result(id: RequestId, result: Result<Value>) -> Self {
        match result {
            Ok(value) => Self::success(id, value),
            Err(error) => Self::failure(id, &error),
        }
    }

    /// Returns `true` if this is a success response.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_type == ResponseType::Success
    }

    /// Returns `true` if this is an error response.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.response_type == ResponseType::Error
    }

    /// Extracts the result value, returning error if response was error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Host`] carrying the reported message if the
    /// response was an error.
    pub fn into_result(self) -> Result<Value> {
        match self.response_type {
            ResponseType::Success => Ok(self.result.unwrap_or(Value::Null)),
            ResponseType::Error => {
                let error_code = self.error.unwrap_or_else(|| "unknown error".to_string());
                let message = self.message.unwrap_or_else(|| error_code.clone());
                Err(Error::host(message))
            }
        }
    }
}

// ============================================================================
// ResponseType
// ============================================================================

/// Response type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Successful response.
    Success,
    /// Error response.
    Error,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::identifiers::ContentsId;

    #[test]
    fn test_request_parse() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "channel": "GUEST_WINDOW_MANAGER_WINDOW_METHOD",
            "args": [12, "focus"]
        }"#;

        let request = Request::from_json(json_str).expect("parse");
        assert_eq!(request.channel, Channel::WindowMethod);
        assert_eq!(request.args, vec![json!(12), json!("focus")]);
    }

    #[test]
    fn test_request_unknown_channel() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "channel": "GUEST_WINDOW_MANAGER_WINDOW_RESIZE",
            "args": []
        }"#;

        let err = Request::from_json(json_str).unwrap_err();
        assert!(err.is_malformed_request());
    }

    #[test]
    fn test_request_args_default_empty() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "channel": "GUEST_WINDOW_MANAGER_WINDOW_OPEN"
        }"#;

        let request = Request::from_json(json_str).expect("parse");
        assert!(request.args.is_empty());
    }

    #[test]
    fn test_request_with_id() {
        let id = RequestId::generate();
        let request = Request::with_id(id, Channel::WindowOpen, vec![]);
        assert_eq!(request.id, id);
    }

    #[test]
    fn test_channel_names_round_trip_serde() {
        for channel in [
            Channel::WindowOpen,
            Channel::WindowMethod,
            Channel::WindowPostMessage,
            Channel::ContentsMethodAsync,
            Channel::ContentsMethodSync,
        ] {
            assert_eq!(serde_json::to_value(channel).unwrap(), json!(channel.name()));
        }
    }

    #[test]
    fn test_sync_channels() {
        assert!(Channel::WindowOpen.is_sync());
        assert!(Channel::ContentsMethodSync.is_sync());
        assert!(!Channel::WindowMethod.is_sync());
        assert!(!Channel::WindowPostMessage.is_sync());
        assert!(!Channel::ContentsMethodAsync.is_sync());
    }

    #[test]
    fn test_failure_response() {
        let id = RequestId::generate();
        let err = Error::access_denied(ContentsId::new(12).unwrap());
        let response = Response::failure(id, &err);

        assert!(response.is_error());
        assert_eq!(response.error.as_deref(), Some("policy violation"));
        assert_eq!(response.message.as_deref(), Some("Access denied to guestId: 12"));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], json!("error"));
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_success_response() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "success",
            "result": 42
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(response.is_success());
        assert!(!response.is_error());
        assert_eq!(response.result, Some(json!(42)));
    }

    #[test]
    fn test_into_result_success() {
        let response = Response::success(RequestId::generate(), json!({ "value": 42 }));
        let result = response.into_result().expect("should succeed");
        assert_eq!(result.get("value").and_then(|v| v.as_u64()), Some(42));
    }

    #[test]
    fn test_into_result_error() {
        let err = Error::method_blocked("reload");
        let response = Response::from_result(RequestId::generate(), Err(err));
        let result = response.into_result();
        assert_eq!(
            result.unwrap_err().to_string(),
            "Host error: Invalid method: reload"
        );
    }
}
