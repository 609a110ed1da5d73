//! Resolved content preferences and the security-relevant inherited set.
//!
//! [`WebPreferences`] is the host's view of the preferences a contents is
//! actually running with, as opposed to whatever an open request asked for.
//! [`INHERITED_PREFERENCES`] lists the flags a child must copy from its
//! embedder whenever the embedder holds exactly that value.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identifiers::ContentsId;

// ============================================================================
// Preference Names
// ============================================================================

/// Well-known preference keys.
pub mod names {
    /// Isolated world for preload scripts.
    pub const CONTEXT_ISOLATION: &str = "contextIsolation";
    /// JavaScript execution.
    pub const JAVASCRIPT: &str = "javascript";
    /// In-process `window.open` handled by the renderer.
    pub const NATIVE_WINDOW_OPEN: &str = "nativeWindowOpen";
    /// Node-style privileged APIs in the page.
    pub const NODE_INTEGRATION: &str = "nodeIntegration";
    /// Remote-module bridge.
    pub const ENABLE_REMOTE_MODULE: &str = "enableRemoteModule";
    /// OS-level sandbox.
    pub const SANDBOX: &str = "sandbox";
    /// Embedded view tag support.
    pub const WEBVIEW_TAG: &str = "webviewTag";
    /// Node-style APIs inside sub-frames.
    pub const NODE_INTEGRATION_IN_SUB_FRAMES: &str = "nodeIntegrationInSubFrames";
    /// Lineage tag linking a guest to its opener.
    pub const OPENER_ID: &str = "openerId";
    /// Embedded-view flag refusing popups.
    pub const DISABLE_POPUPS: &str = "disablePopups";
}

// ============================================================================
// InheritedPreference
// ============================================================================

/// A preference value that propagates from embedder to guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InheritedPreference {
    /// Preference key.
    pub name: &'static str,
    /// The restrictive value that is copied down.
    pub value: bool,
}

impl InheritedPreference {
    const fn new(name: &'static str, value: bool) -> Self {
        Self { name, value }
    }
}

/// Security options every child inherits from its embedder.
pub const INHERITED_PREFERENCES: [InheritedPreference; 8] = [
    InheritedPreference::new(names::CONTEXT_ISOLATION, true),
    InheritedPreference::new(names::JAVASCRIPT, false),
    InheritedPreference::new(names::NATIVE_WINDOW_OPEN, true),
    InheritedPreference::new(names::NODE_INTEGRATION, false),
    InheritedPreference::new(names::ENABLE_REMOTE_MODULE, false),
    InheritedPreference::new(names::SANDBOX, true),
    InheritedPreference::new(names::WEBVIEW_TAG, false),
    InheritedPreference::new(names::NODE_INTEGRATION_IN_SUB_FRAMES, false),
];

// ============================================================================
// WebPreferences
// ============================================================================

/// Preferences a live contents resolved to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebPreferences(Map<String, Value>);

impl WebPreferences {
    /// Creates an empty preference set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Sets a preference, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value for `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the underlying map.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns `true` if `key` holds a truthy value.
    #[must_use]
    pub fn is_enabled(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    /// Returns `true` if `key` holds exactly the boolean `value`.
    #[must_use]
    pub fn holds(&self, key: &str, value: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool) == Some(value)
    }

    /// Returns the opener id recorded on this contents, if any.
    #[must_use]
    pub fn opener_id(&self) -> Option<&Value> {
        self.0.get(names::OPENER_ID)
    }

    /// Returns `true` if this contents was opened by `opener`.
    #[must_use]
    pub fn is_opened_by(&self, opener: ContentsId) -> bool {
        self.opener_id().is_some_and(|id| opener.matches(id))
    }

    /// Returns `true` if native `window.open` is active.
    #[inline]
    #[must_use]
    pub fn native_window_open(&self) -> bool {
        self.is_enabled(names::NATIVE_WINDOW_OPEN)
    }

    /// Returns `true` if the contents is sandboxed.
    #[inline]
    #[must_use]
    pub fn sandbox(&self) -> bool {
        self.is_enabled(names::SANDBOX)
    }

    /// Returns `true` if node integration is strictly enabled.
    #[inline]
    #[must_use]
    pub fn node_integration(&self) -> bool {
        self.holds(names::NODE_INTEGRATION, true)
    }

    /// Returns `true` if popups are refused.
    #[inline]
    #[must_use]
    pub fn disable_popups(&self) -> bool {
        self.is_enabled(names::DISABLE_POPUPS)
    }

    /// Copies every inherited preference the embedder holds into `child`.
    pub fn stamp_inherited(&self, child: &mut Map<String, Value>) {
        for pref in INHERITED_PREFERENCES {
            if self.holds(pref.name, pref.value) {
                child.insert(pref.name.to_string(), Value::Bool(pref.value));
            }
        }
    }
}

impl From<Map<String, Value>> for WebPreferences {
    #[inline]
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ============================================================================
// Truthiness
// ============================================================================

/// Loose truthiness as seen by renderer-side preference checks.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Tests
// ============================================================================
