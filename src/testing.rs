//! In-memory host for unit tests.
//!
//! [`MockHost`] keeps a contents table and a window table, and records every
//! side effect the broker asks for so tests can assert on them.

// ============================================================================
// Imports
// ============================================================================

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::broker::Broker;
use crate::broker::core::BrokerInner;
use crate::error::{Error, Result};
use crate::host::{
    ContentsInfo, ContentsKind, GuestHandle, Host, LoadOptions, ParsedFeatures, WindowState,
};
use crate::identifiers::{ContentsId, WindowId};
use crate::protocol::{ContentsMethod, InternalMessage, WindowMethod};
use crate::window::{TITLE_KEY, WebPreferences, WindowOptions};

// ============================================================================
// Constants
// ============================================================================

/// First id handed out by [`MockHost::create_window`].
const FIRST_CREATED_ID: u32 = 100;

/// Feature names the mock parser maps to content preferences.
const PREFERENCE_FEATURES: [&str; 6] = [
    "contextIsolation",
    "javascript",
    "nativeWindowOpen",
    "nodeIntegration",
    "sandbox",
    "webviewTag",
];

// ============================================================================
// Fixtures
// ============================================================================

/// Top-level window contents with the given preferences.
pub(crate) fn window_contents(id: u32, url: &str, prefs: WebPreferences) -> ContentsInfo {
    let id = ContentsId::new(id).expect("fixture ids are non-zero");
    ContentsInfo::new(id, ContentsKind::Window, url).with_preferences(prefs)
}

// ============================================================================
// MockHost
// ============================================================================

#[derive(Default)]
struct State {
    contents: FxHashMap<ContentsId, ContentsInfo>,
    windows: FxHashMap<WindowId, (ContentsId, WindowState)>,
    next_id: u32,
    fail_create: bool,
    fail_load: bool,
    fail_send: bool,

    created: Vec<WindowOptions>,
    loads: Vec<(ContentsId, String, LoadOptions)>,
    destroyed: Vec<WindowId>,
    messages: Vec<(ContentsId, InternalMessage)>,
    window_calls: Vec<(WindowId, WindowMethod)>,
    contents_calls: Vec<(ContentsId, ContentsMethod)>,
}

/// Recording host.
#[derive(Default)]
pub(crate) struct MockHost {
    state: Mutex<State>,
    broker: Mutex<Weak<BrokerInner>>,
}

impl MockHost {
    pub(crate) fn new() -> Self {
        let host = Self::default();
        host.state.lock().next_id = FIRST_CREATED_ID;
        host
    }

    // ------------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------------

    pub(crate) fn add_contents(&self, info: ContentsInfo) {
        self.state.lock().contents.insert(info.id, info);
    }

    pub(crate) fn remove_contents(&self, id: ContentsId) {
        self.state.lock().contents.remove(&id);
    }

    pub(crate) fn set_url(&self, id: ContentsId, url: &str) {
        if let Some(info) = self.state.lock().contents.get_mut(&id) {
            info.url = url.to_string();
        }
    }

    pub(crate) fn set_creation_options(&self, id: ContentsId, options: WindowOptions) {
        if let Some(info) = self.state.lock().contents.get_mut(&id) {
            info.creation_options = Some(options);
        }
    }

    pub(crate) fn add_window(&self, window: WindowId, contents: ContentsId, state: WindowState) {
        self.state.lock().windows.insert(window, (contents, state));
    }

    /// Makes every later `create_window` fail.
    pub(crate) fn fail_create_window(&self) {
        self.state.lock().fail_create = true;
    }

    /// Makes every later `load_url` fail after recording the attempt.
    pub(crate) fn fail_load_url(&self) {
        self.state.lock().fail_load = true;
    }

    /// Makes every later `send_internal` fail without delivering.
    pub(crate) fn fail_send_internal(&self) {
        self.state.lock().fail_send = true;
    }

    /// Fires `broker`'s close signal from inside `destroy_window`, the way a
    /// real host does.
    pub(crate) fn close_on_destroy(&self, broker: &Broker) {
        *self.broker.lock() = Arc::downgrade(&broker.inner);
    }

    // ------------------------------------------------------------------------
    // Recordings
    // ------------------------------------------------------------------------

    pub(crate) fn created(&self) -> Vec<WindowOptions> {
        self.state.lock().created.clone()
    }

    pub(crate) fn loads(&self) -> Vec<(ContentsId, String, LoadOptions)> {
        self.state.lock().loads.clone()
    }

    pub(crate) fn destroyed(&self) -> Vec<WindowId> {
        self.state.lock().destroyed.clone()
    }

    pub(crate) fn messages(&self) -> Vec<(ContentsId, InternalMessage)> {
        self.state.lock().messages.clone()
    }

    pub(crate) fn window_calls(&self) -> Vec<(WindowId, WindowMethod)> {
        self.state.lock().window_calls.clone()
    }

    pub(crate) fn contents_calls(&self) -> Vec<(ContentsId, ContentsMethod)> {
        self.state.lock().contents_calls.clone()
    }
}

// ============================================================================
// Host Implementation
// ============================================================================

#[async_trait]
impl Host for MockHost {
    fn contents(&self, id: ContentsId) -> Option<ContentsInfo> {
        self.state.lock().contents.get(&id).cloned()
    }

    fn owner_window(&self, contents: ContentsId) -> Option<WindowId> {
        self.state
            .lock()
            .windows
            .iter()
            .find(|(_, (owned, _))| *owned == contents)
            .map(|(window, _)| *window)
    }

    fn window_state(&self, window: WindowId) -> Option<WindowState> {
        self.state.lock().windows.get(&window).map(|(_, state)| *state)
    }

    /// Comma separated `key=value` pairs; numbers become window options,
    /// known preference names become booleans, bare words are additional.
    fn parse_features(&self, features: &str) -> ParsedFeatures {
        let mut parsed = ParsedFeatures::default();
        for feature in features.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let Some((key, value)) = feature.split_once('=') else {
                parsed.additional_features.push(feature.to_string());
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            if PREFERENCE_FEATURES.contains(&key) {
                let enabled = matches!(value, "yes" | "true" | "1");
                parsed.web_preferences.insert(key.to_string(), Value::Bool(enabled));
            } else if let Ok(number) = value.parse::<i64>() {
                parsed.options.set(key, number);
            } else if key == TITLE_KEY {
                parsed.options.set(key, value);
            } else {
                parsed.options.set(key, matches!(value, "yes" | "true"));
            }
        }
        parsed
    }

    fn create_window(&self, options: &WindowOptions) -> Result<GuestHandle> {
        let mut state = self.state.lock();
        if state.fail_create {
            return Err(Error::host("window creation failed"));
        }

        let raw = state.next_id;
        state.next_id += 1;
        let window = WindowId::new(raw).ok_or_else(|| Error::host("id overflow"))?;
        let contents = ContentsId::new(raw).ok_or_else(|| Error::host("id overflow"))?;

        let prefs: Map<String, Value> = options.web_preferences().cloned().unwrap_or_default();
        let info = ContentsInfo::new(contents, ContentsKind::Window, "about:blank")
            .with_preferences(WebPreferences::from(prefs))
            .with_creation_options(options.clone());

        state.contents.insert(contents, info);
        state.windows.insert(window, (contents, WindowState::default()));
        state.created.push(options.clone());

        Ok(GuestHandle::new(window, contents))
    }

    fn load_url(&self, contents: ContentsId, url: &str, options: &LoadOptions) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(info) = state.contents.get_mut(&contents) {
            info.url = url.to_string();
        }
        state.loads.push((contents, url.to_string(), options.clone()));
        if state.fail_load {
            return Err(Error::host("navigation failed"));
        }
        Ok(())
    }

    fn destroy_window(&self, window: WindowId) -> Result<()> {
        let closed = {
            let mut state = self.state.lock();
            state.destroyed.push(window);
            let closed = state.windows.remove(&window).map(|(contents, _)| contents);
            if let Some(contents) = closed {
                state.contents.remove(&contents);
            }
            closed
        };

        let broker = self.broker.lock().upgrade();
        if let (Some(inner), Some(contents)) = (broker, closed) {
            Broker { inner }.on_guest_closed(contents);
        }
        Ok(())
    }

    fn call_window_method(&self, window: WindowId, method: &WindowMethod) -> Result<Value> {
        self.state.lock().window_calls.push((window, *method));
        Ok(Value::Null)
    }

    async fn call_contents_method(
        &self,
        contents: ContentsId,
        method: ContentsMethod,
    ) -> Result<Value> {
        self.state.lock().contents_calls.push((contents, method));
        Ok(Value::Null)
    }

    fn send_internal(&self, to: ContentsId, message: InternalMessage) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_send {
            return Err(Error::host("receiver unreachable"));
        }
        state.messages.push((to, message));
        Ok(())
    }
}
