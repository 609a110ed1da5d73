//! Error types for the guest-window broker.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use guest_window_broker::{Error, Result};
//!
//! fn example(broker: &Broker, sender: ContentsId) -> Result<()> {
//!     let guest = broker.open_raw(sender, Some("https://example.com"), None, None)?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Policy violation | [`Error::AccessDenied`], [`Error::MethodBlocked`] |
//! | Invalid reference | [`Error::InvalidId`], [`Error::ContentsNotFound`], [`Error::WindowNotFound`] |
//! | Malformed request | [`Error::MalformedRequest`], [`Error::OpenDenied`] |
//! | Configuration | [`Error::Config`] |
//! | External | [`Error::Host`], [`Error::Json`] |
//!
//! A suppressed open (popups disabled, or the new-window hook canceled without
//! a substitute) is not an error; it surfaces as a `None` guest id.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::ContentsId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Policy Violations
    // ========================================================================
    /// Sender failed the access check for the target.
    #[error("Access denied to guestId: {target}")]
    AccessDenied {
        /// The contents the sender tried to reach.
        target: ContentsId,
    },

    /// Method is not on the endpoint's allow-list.
    #[error("Invalid method: {method}")]
    MethodBlocked {
        /// The refused method name, as received.
        method: String,
    },

    // ========================================================================
    // Invalid References
    // ========================================================================
    /// Id argument is not an integer in the host id range.
    #[error("Invalid guestId: {value}")]
    InvalidId {
        /// The offending wire value.
        value: String,
    },

    /// No live contents has this id.
    #[error("Invalid guestId: {id}")]
    ContentsNotFound {
        /// The missing contents id.
        id: ContentsId,
    },

    /// The contents has no owner window, directly or through its host.
    #[error("getGuestWindow failed for contents {contents}")]
    WindowNotFound {
        /// The contents whose window could not be resolved.
        contents: ContentsId,
    },

    // ========================================================================
    // Malformed Requests
    // ========================================================================
    /// Request shape is invalid for its endpoint.
    #[error("Malformed request: {message}")]
    MalformedRequest {
        /// Description of what was wrong.
        message: String,
    },

    /// Raw window.open from a sender that must use native window.open.
    #[error("GUEST_WINDOW_MANAGER_WINDOW_OPEN denied for {sender}: expected native window.open")]
    OpenDenied {
        /// The ineligible sender.
        sender: ContentsId,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Broker configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// The host environment failed an operation.
    #[error("Host error: {message}")]
    Host {
        /// Error message reported by the host.
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an access denied error.
    #[inline]
    pub fn access_denied(target: ContentsId) -> Self {
        Self::AccessDenied { target }
    }

    /// Creates a method blocked error.
    #[inline]
    pub fn method_blocked(method: impl Into<String>) -> Self {
        Self::MethodBlocked {
            method: method.into(),
        }
    }

    /// Creates an invalid id error from the raw wire value.
    #[inline]
    pub fn invalid_id(value: impl ToString) -> Self {
        Self::InvalidId {
            value: value.to_string(),
        }
    }

    /// Creates a contents not found error.
    #[inline]
    pub fn contents_not_found(id: ContentsId) -> Self {
        Self::ContentsNotFound { id }
    }

    /// Creates a window not found error.
    #[inline]
    pub fn window_not_found(contents: ContentsId) -> Self {
        Self::WindowNotFound { contents }
    }

    /// Creates a malformed request error.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Creates an open denied error.
    #[inline]
    pub fn open_denied(sender: ContentsId) -> Self {
        Self::OpenDenied { sender }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a host error.
    #[inline]
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the call was refused by the access policy.
    #[inline]
    #[must_use]
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::AccessDenied { .. } | Self::MethodBlocked { .. }
        )
    }

    /// Returns `true` if an id could not be resolved to a live object.
    #[inline]
    #[must_use]
    pub fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            Self::InvalidId { .. } | Self::ContentsNotFound { .. } | Self::WindowNotFound { .. }
        )
    }

    /// Returns `true` if the request itself was malformed.
    #[inline]
    #[must_use]
    pub fn is_malformed_request(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest { .. } | Self::OpenDenied { .. } | Self::Json(_)
        )
    }

    /// Stable error code reported over the message bridge.
    #[must_use]
    pub fn code(&self) -> &'static str {
        if self.is_policy_violation() {
            "policy violation"
        } else if self.is_invalid_reference() {
            "invalid reference"
        } else if self.is_malformed_request() {
            "malformed request"
        } else {
            match self {
                Self::Config { .. } => "configuration error",
                _ => "host error",
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> ContentsId {
        ContentsId::new(raw).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = Error::access_denied(id(7));
        assert_eq!(err.to_string(), "Access denied to guestId: 7");

        let err = Error::method_blocked("reload");
        assert_eq!(err.to_string(), "Invalid method: reload");
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing host");
        assert_eq!(err.to_string(), "Configuration error: missing host");
    }

    #[test]
    fn test_is_policy_violation() {
        assert!(Error::access_denied(id(1)).is_policy_violation());
        assert!(Error::method_blocked("close").is_policy_violation());
        assert!(!Error::invalid_id(0).is_policy_violation());
    }

    #[test]
    fn test_is_invalid_reference() {
        assert!(Error::invalid_id("4294967296").is_invalid_reference());
        assert!(Error::contents_not_found(id(3)).is_invalid_reference());
        assert!(Error::window_not_found(id(3)).is_invalid_reference());
        assert!(!Error::malformed("x").is_invalid_reference());
    }

    #[test]
    fn test_is_malformed_request() {
        assert!(Error::malformed("missing method").is_malformed_request());
        assert!(Error::open_denied(id(2)).is_malformed_request());
        assert!(!Error::host("boom").is_malformed_request());
    }

    #[test]
    fn test_code() {
        assert_eq!(Error::access_denied(id(1)).code(), "policy violation");
        assert_eq!(Error::contents_not_found(id(1)).code(), "invalid reference");
        assert_eq!(Error::open_denied(id(1)).code(), "malformed request");
        assert_eq!(Error::config("x").code(), "configuration error");
        assert_eq!(Error::host("x").code(), "host error");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
