//! The host environment the broker mediates for.
//!
//! The broker never owns windows. Everything it knows about a window, and
//! every side effect it causes, goes through the [`Host`] trait:
//!
//! | Concern | Methods |
//! |---------|---------|
//! | Contents registry | [`Host::contents`] |
//! | Window registry | [`Host::owner_window`], [`Host::window_state`] |
//! | Primitives | [`Host::parse_features`], [`Host::is_same_origin`] |
//! | Creation and loading | [`Host::create_window`], [`Host::load_url`] |
//! | Teardown | [`Host::destroy_window`] |
//! | Allow-listed calls | [`Host::call_window_method`], [`Host::call_contents_method`] |
//! | Message bridge | [`Host::send_internal`] |
//!
//! Lookups return a fresh snapshot on every call. Callers must not cache
//! them: navigation changes a contents' origin between two calls.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::Result;
use crate::identifiers::{ContentsId, WindowId};
use crate::protocol::{ContentsMethod, InternalMessage, WindowMethod};
use crate::window::{PostDataChunk, WebPreferences, WindowOptions};

// ============================================================================
// ContentsKind
// ============================================================================

/// What kind of rendering context a contents is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentsKind {
    /// Main contents of a top-level window.
    Window,
    /// Contents attached to a view inside a window.
    BrowserView,
    /// Embedded `<webview>` guest.
    #[serde(rename = "webview")]
    WebView,
    /// Contents living in another process.
    Remote,
    /// Extension background page.
    BackgroundPage,
    /// Offscreen rendering target.
    Offscreen,
}

impl ContentsKind {
    /// Returns `true` for embedded `<webview>` guests.
    #[inline]
    #[must_use]
    pub fn is_webview(self) -> bool {
        self == Self::WebView
    }
}

// ============================================================================
// ContentsInfo
// ============================================================================

/// Snapshot of a live contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentsInfo {
    /// Contents id.
    pub id: ContentsId,

    /// Kind of rendering context.
    pub kind: ContentsKind,

    /// Current URL.
    pub url: String,

    /// Preferences the contents resolved to.
    pub preferences: WebPreferences,

    /// Options the contents' window was created with, when the broker or
    /// the application created it as a top-level window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_options: Option<WindowOptions>,

    /// Embedder of this contents, for embedded views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_contents: Option<ContentsId>,
}

impl ContentsInfo {
    /// Creates a snapshot with empty preferences.
    #[must_use]
    pub fn new(id: ContentsId, kind: ContentsKind, url: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            url: url.into(),
            preferences: WebPreferences::new(),
            creation_options: None,
            host_contents: None,
        }
    }

    /// Sets the resolved preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: WebPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Sets the window creation options.
    #[must_use]
    pub fn with_creation_options(mut self, options: WindowOptions) -> Self {
        self.creation_options = Some(options);
        self
    }

    /// Sets the host contents.
    #[must_use]
    pub fn with_host_contents(mut self, host: ContentsId) -> Self {
        self.host_contents = Some(host);
        self
    }
}

// ============================================================================
// Window State
// ============================================================================

/// Window rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Bounds {
    /// Creates bounds from position and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Renders the bounds as window option keys.
    #[must_use]
    pub fn to_options(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("x".into(), self.x.into());
        map.insert("y".into(), self.y.into());
        map.insert("width".into(), self.width.into());
        map.insert("height".into(), self.height.into());
        map
    }
}

/// Live state of a top-level window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    /// Current bounds.
    pub bounds: Bounds,
    /// Whether the window is currently visible.
    pub visible: bool,
}

// ============================================================================
// GuestHandle
// ============================================================================

/// A guest window and its main contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestHandle {
    /// The guest's top-level window.
    pub window: WindowId,
    /// The guest's main contents; this is the guest id.
    pub contents: ContentsId,
}

impl GuestHandle {
    /// Pairs a window with its contents.
    #[inline]
    #[must_use]
    pub const fn new(window: WindowId, contents: ContentsId) -> Self {
        Self { window, contents }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Referrer policy sent with a navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    /// Host default.
    #[default]
    Default,
    /// Full URL always.
    UnsafeUrl,
    /// Full URL unless downgrading to http.
    NoReferrerWhenDowngrade,
    /// Never send a referrer.
    NoReferrer,
    /// Origin only.
    Origin,
    /// Full URL same-origin, origin otherwise.
    OriginWhenCrossOrigin,
    /// Full URL same-origin only.
    SameOrigin,
    /// Origin unless downgrading.
    StrictOrigin,
    /// Full URL same-origin, origin cross-origin, nothing on downgrade.
    StrictOriginWhenCrossOrigin,
}

/// HTTP referrer for a navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrer {
    /// Referrer URL; empty for none.
    pub url: String,
    /// Referrer policy.
    pub policy: ReferrerPolicy,
}

impl Referrer {
    /// Creates a referrer.
    #[must_use]
    pub fn new(url: impl Into<String>, policy: ReferrerPolicy) -> Self {
        Self {
            url: url.into(),
            policy,
        }
    }
}

/// Options for loading a URL into a contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOptions {
    /// Referrer for the navigation.
    pub http_referrer: Referrer,

    /// POST body, if the navigation is a form submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<Vec<PostDataChunk>>,

    /// Extra header lines, `\n` separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<String>,
}

// ============================================================================
// ParsedFeatures
// ============================================================================

/// Result of parsing a `window.open` features string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFeatures {
    /// Window options.
    pub options: WindowOptions,
    /// Content preferences.
    pub web_preferences: Map<String, Value>,
    /// Features the parser did not recognize.
    pub additional_features: Vec<String>,
}

// ============================================================================
// Host Trait
// ============================================================================

/// Window and contents registry of the embedding application.
#[async_trait]
pub trait Host: Send + Sync {
    /// Looks up a live contents.
    fn contents(&self, id: ContentsId) -> Option<ContentsInfo>;

    /// Resolves the top-level window showing `contents`, if any.
    fn owner_window(&self, contents: ContentsId) -> Option<WindowId>;

    /// Looks up a live window.
    fn window_state(&self, window: WindowId) -> Option<WindowState>;

    /// Parses a `window.open` features string.
    fn parse_features(&self, features: &str) -> ParsedFeatures;

    /// Returns `true` if both URLs share an origin.
    ///
    /// The default compares URL origin tuples; opaque origins never match.
    fn is_same_origin(&self, a: &str, b: &str) -> bool {
        match (Url::parse(a), Url::parse(b)) {
            (Ok(a), Ok(b)) => {
                let (a, b) = (a.origin(), b.origin());
                a.is_tuple() && a == b
            }
            _ => false,
        }
    }

    /// Creates a top-level window from fully resolved options.
    fn create_window(&self, options: &WindowOptions) -> Result<GuestHandle>;

    /// Starts loading `url` into `contents`.
    fn load_url(&self, contents: ContentsId, url: &str, options: &LoadOptions) -> Result<()>;

    /// Destroys a window without running close handlers in its page.
    fn destroy_window(&self, window: WindowId) -> Result<()>;

    /// Invokes an allow-listed window method.
    fn call_window_method(&self, window: WindowId, method: &WindowMethod) -> Result<Value>;

    /// Invokes an allow-listed contents method, completing asynchronously.
    async fn call_contents_method(&self, contents: ContentsId, method: ContentsMethod)
    -> Result<Value>;

    /// Delivers an internal message to a rendering context.
    fn send_internal(&self, to: ContentsId, message: InternalMessage) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::testing::MockHost;

    #[test]
    fn test_default_same_origin() {
        let host = MockHost::new();
        assert!(host.is_same_origin("https://a.test/x", "https://a.test/y?z"));
        assert!(host.is_same_origin("https://a.test", "https://a.test:443/"));
        assert!(!host.is_same_origin("https://a.test", "http://a.test"));
        assert!(!host.is_same_origin("https://a.test", "https://b.test"));
        assert!(!host.is_same_origin("https://a.test:8443", "https://a.test"));
    }

    #[test]
    fn test_opaque_origins_never_match() {
        let host = MockHost::new();
        assert!(!host.is_same_origin("about:blank", "about:blank"));
        assert!(!host.is_same_origin("data:text/html,x", "data:text/html,x"));
        assert!(!host.is_same_origin("not a url", "not a url"));
    }

    #[test]
    fn test_bounds_to_options() {
        let bounds = Bounds::new(10, -5, 800, 600);
        assert_eq!(
            Value::Object(bounds.to_options()),
            json!({ "x": 10, "y": -5, "width": 800, "height": 600 })
        );
    }

    #[test]
    fn test_contents_kind_serde() {
        assert_eq!(serde_json::to_value(ContentsKind::WebView).unwrap(), json!("webview"));
        assert_eq!(
            serde_json::to_value(ContentsKind::BrowserView).unwrap(),
            json!("browserView")
        );
        assert!(ContentsKind::WebView.is_webview());
        assert!(!ContentsKind::Window.is_webview());
    }

    #[test]
    fn test_referrer_default() {
        let referrer = Referrer::default();
        assert!(referrer.url.is_empty());
        assert_eq!(serde_json::to_value(referrer.policy).unwrap(), json!("default"));
    }
}
