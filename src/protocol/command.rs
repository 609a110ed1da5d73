//! Allow-listed operations, one closed enum per endpoint family.
//!
//! Method names arrive as strings over the message bridge. Each family
//! parses them with an exhaustive `match`; a name that is not listed here
//! is refused with [`Error::MethodBlocked`] and can only be added by
//! changing this file.
//!
//! | Family | Enum | Methods |
//! |--------|------|---------|
//! | Window control | [`WindowMethod`] | `destroy`, `focus`, `blur` |
//! | Contents, async | [`ContentsMethod`] | `loadURL`, `executeJavaScript`, `print` |
//! | Contents, sync | [`SyncContentsMethod`] | `getURL` |

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ============================================================================
// WindowMethod
// ============================================================================

/// Window control methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowMethod {
    /// Force-close the window.
    Destroy,
    /// Focus the window.
    Focus,
    /// Remove focus from the window.
    Blur,
}

impl WindowMethod {
    /// Parses an allow-listed window method.
    ///
    /// Arguments are accepted and ignored; none of these methods take any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MethodBlocked`] for any other name.
    pub fn parse(name: &str, _args: &[Value]) -> Result<Self> {
        match name {
            "destroy" => Ok(Self::Destroy),
            "focus" => Ok(Self::Focus),
            "blur" => Ok(Self::Blur),
            other => Err(Error::method_blocked(other)),
        }
    }

    /// Wire name of the method.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Destroy => "destroy",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

// ============================================================================
// ContentsMethod
// ============================================================================

/// Contents methods completing asynchronously.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum ContentsMethod {
    /// Navigate to a URL.
    #[serde(rename = "loadURL")]
    LoadUrl {
        /// Destination URL.
        url: String,
        /// Load options, passed through to the host.
        #[serde(skip_serializing_if = "Option::is_none")]
        options: Option<Map<String, Value>>,
    },

    /// Run script in the page.
    #[serde(rename = "executeJavaScript")]
    ExecuteJavaScript {
        /// Script source.
        code: String,
        /// Treat the call as a user gesture.
        #[serde(rename = "userGesture")]
        user_gesture: bool,
    },

    /// Print the page.
    #[serde(rename = "print")]
    Print {
        /// Print options, passed through to the host.
        #[serde(skip_serializing_if = "Option::is_none")]
        options: Option<Map<String, Value>>,
    },
}

impl ContentsMethod {
    /// Parses an allow-listed async contents method and its arguments.
    ///
    /// # Errors
    ///
    /// - [`Error::MethodBlocked`] for names outside the allow-list
    /// - [`Error::MalformedRequest`] for arguments of the wrong shape
    pub fn parse(name: &str, args: &[Value]) -> Result<Self> {
        match name {
            "loadURL" => Ok(Self::LoadUrl {
                url: required_string(name, args, 0)?,
                options: optional_object(name, args, 1)?,
            }),
            "executeJavaScript" => Ok(Self::ExecuteJavaScript {
                code: required_string(name, args, 0)?,
                user_gesture: optional_bool(name, args, 1)?,
            }),
            "print" => Ok(Self::Print {
                options: optional_object(name, args, 0)?,
            }),
            other => Err(Error::method_blocked(other)),
        }
    }

    /// Wire name of the method.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadUrl { .. } => "loadURL",
            Self::ExecuteJavaScript { .. } => "executeJavaScript",
            Self::Print { .. } => "print",
        }
    }
}

// ============================================================================
// SyncContentsMethod
// ============================================================================

/// Contents methods answered immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncContentsMethod {
    /// Read the current URL.
    #[serde(rename = "getURL")]
    GetUrl,
}

impl SyncContentsMethod {
    /// Parses an allow-listed sync contents method.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MethodBlocked`] for any other name.
    pub fn parse(name: &str, _args: &[Value]) -> Result<Self> {
        match name {
            "getURL" => Ok(Self::GetUrl),
            other => Err(Error::method_blocked(other)),
        }
    }

    /// Wire name of the method.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetUrl => "getURL",
        }
    }
}

// ============================================================================
// Argument Helpers
// ============================================================================

fn required_string(method: &str, args: &[Value], index: usize) -> Result<String> {
    args.get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::malformed(format!("{method}: argument {index} must be a string")))
}

fn optional_object(
    method: &str,
    args: &[Value],
    index: usize,
) -> Result<Option<Map<String, Value>>> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(_) => Err(Error::malformed(format!(
            "{method}: argument {index} must be an object"
        ))),
    }
}

fn optional_bool(method: &str, args: &[Value], index: usize) -> Result<bool> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(Error::malformed(format!(
            "{method}: argument {index} must be a boolean"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
