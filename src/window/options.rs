//! Window configuration passed to the host at creation time.
//!
//! A [`WindowOptions`] is a JSON object map with a nested `webPreferences`
//! section. The broker never interprets most keys; it only merges them,
//! stamps security preferences and reads a few well-known entries.
//!
//! # Example
//!
//! ```
//! use guest_window_broker::WindowOptions;
//!
//! let mut options = WindowOptions::new().with("width", 800).with("title", "Popup");
//! options.web_preferences_mut().insert("sandbox".into(), true.into());
//!
//! assert_eq!(options.title(), Some("Popup"));
//! assert_eq!(options.web_preference("sandbox"), Some(&true.into()));
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identifiers::ContentsId;

use super::merge::merge_options;

// ============================================================================
// Constants
// ============================================================================

/// Key of the nested content-preferences section.
pub const WEB_PREFERENCES_KEY: &str = "webPreferences";

/// Reserved key that is never inherited.
pub const TYPE_KEY: &str = "type";

/// Key carrying a pre-existing contents the window should adopt.
pub const WEB_CONTENTS_KEY: &str = "webContents";

/// Window title key.
pub const TITLE_KEY: &str = "title";

// ============================================================================
// WindowOptions
// ============================================================================

/// Configuration for a window about to be created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowOptions(Map<String, Value>);

// ============================================================================
// Constructors
// ============================================================================

impl WindowOptions {
    /// Creates an empty configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps an existing object map.
    #[inline]
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Sets a key, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Sets a content preference, builder style.
    #[must_use]
    pub fn with_web_preference(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.web_preferences_mut().insert(key.into(), value.into());
        self
    }

    /// Adopts an existing contents instead of creating a fresh one.
    #[must_use]
    pub fn with_web_contents(self, contents: ContentsId) -> Self {
        self.with(WEB_CONTENTS_KEY, contents)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl WindowOptions {
    /// Returns the value for `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets `key` to `value`, replacing any previous value.
    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the underlying map.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the underlying map mutably.
    #[inline]
    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Consumes the options, returning the map.
    #[inline]
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Returns the window title if it is a non-empty string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.0
            .get(TITLE_KEY)
            .and_then(Value::as_str)
            .filter(|title| !title.is_empty())
    }

    /// Returns the contents this window adopts, if any.
    #[must_use]
    pub fn web_contents(&self) -> Option<ContentsId> {
        self.0.get(WEB_CONTENTS_KEY).and_then(ContentsId::from_value)
    }

    /// Returns the `webPreferences` section if present and an object.
    #[must_use]
    pub fn web_preferences(&self) -> Option<&Map<String, Value>> {
        self.0.get(WEB_PREFERENCES_KEY).and_then(Value::as_object)
    }

    /// Returns a single content preference.
    #[must_use]
    pub fn web_preference(&self, key: &str) -> Option<&Value> {
        self.web_preferences().and_then(|prefs| prefs.get(key))
    }

    /// Returns the `webPreferences` section, creating it when missing.
    ///
    /// A non-object value under the key is replaced with an empty object.
    pub fn web_preferences_mut(&mut self) -> &mut Map<String, Value> {
        let slot = self
            .0
            .entry(WEB_PREFERENCES_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        slot.as_object_mut().expect("webPreferences slot was just set to an object")
    }

    /// Replaces the `webPreferences` section.
    pub fn set_web_preferences(&mut self, prefs: Map<String, Value>) {
        self.0
            .insert(WEB_PREFERENCES_KEY.to_string(), Value::Object(prefs));
    }
}

// ============================================================================
// Merging
// ============================================================================

impl WindowOptions {
    /// Back-fills keys from `parent` that this configuration lacks.
    ///
    /// See [`merge_options`] for the exact rules.
    pub fn inherit_from(&mut self, parent: &Map<String, Value>) {
        merge_options(&mut self.0, parent);
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl From<Map<String, Value>> for WindowOptions {
    #[inline]
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<WindowOptions> for Value {
    #[inline]
    fn from(options: WindowOptions) -> Self {
        Value::Object(options.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
