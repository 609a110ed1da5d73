//! Events raised by the broker.
//!
//! Two directions:
//!
//! | Type | Direction | Purpose |
//! |------|-----------|---------|
//! | [`NewWindowEvent`] | Broker → application hook | Veto or replace a new guest |
//! | [`InternalMessage`] | Broker → rendering context | Close and postMessage notices |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::host::{GuestHandle, Referrer};
use crate::identifiers::ContentsId;
use crate::window::{PostBody, WindowOptions};

// ============================================================================
// Channel Names
// ============================================================================

/// Prefix of the per-guest close notice; the guest id is appended.
pub const WINDOW_CLOSED_CHANNEL_PREFIX: &str = "GUEST_WINDOW_MANAGER_WINDOW_CLOSED_";

/// Channel carrying cross-window messages.
pub const POSTMESSAGE_CHANNEL: &str = "GUEST_WINDOW_POSTMESSAGE";

// ============================================================================
// Disposition
// ============================================================================

/// Where the embedder asked for the new content to appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    /// Host decides.
    Default,
    /// New tab, focused.
    ForegroundTab,
    /// New tab, not focused.
    BackgroundTab,
    /// New top-level window.
    #[default]
    NewWindow,
    /// Download instead of display.
    SaveToDisk,
    /// Anything else.
    Other,
}

// ============================================================================
// NewWindowEvent
// ============================================================================

/// Everything known about a pending guest before it is created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWindowEvent {
    /// The embedder asking for the window.
    pub sender: ContentsId,
    /// URL the guest will load.
    pub url: String,
    /// Requested frame name; empty for none.
    pub frame_name: String,
    /// Requested disposition.
    pub disposition: Disposition,
    /// Options after inheritance from the embedder.
    pub options: WindowOptions,
    /// Features the parser did not recognize.
    pub additional_features: Vec<String>,
    /// Referrer for the load.
    pub referrer: Referrer,
    /// Classified POST body, if any.
    pub post_body: Option<PostBody>,
}

// ============================================================================
// NewWindowDecision
// ============================================================================

/// Outcome of the application's new-window hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NewWindowDecision {
    /// Let the broker create the guest.
    #[default]
    Proceed,
    /// Suppress the window.
    Cancel,
    /// Use this window instead of creating one.
    Substitute(GuestHandle),
}

// ============================================================================
// NewWindowHook
// ============================================================================

/// Application callback consulted before a guest is created.
///
/// Closures of the right shape implement this trait.
///
/// ```
/// use guest_window_broker::{NewWindowDecision, NewWindowEvent, NewWindowHook};
///
/// let hook = |event: &NewWindowEvent| {
///     if event.url.starts_with("https://") {
///         NewWindowDecision::Proceed
///     } else {
///         NewWindowDecision::Cancel
///     }
/// };
/// fn assert_hook<H: NewWindowHook>(_: &H) {}
/// assert_hook(&hook);
/// ```
pub trait NewWindowHook: Send + Sync {
    /// Decides what happens to the pending guest.
    fn on_new_window(&self, event: &NewWindowEvent) -> NewWindowDecision;
}

impl<F> NewWindowHook for F
where
    F: Fn(&NewWindowEvent) -> NewWindowDecision + Send + Sync,
{
    fn on_new_window(&self, event: &NewWindowEvent) -> NewWindowDecision {
        self(event)
    }
}

// ============================================================================
// InternalMessage
// ============================================================================

/// Message pushed to a rendering context over the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum InternalMessage {
    /// A guest this context opened has closed by means other than
    /// the context's own teardown.
    WindowClosed {
        /// The closed guest.
        guest_id: ContentsId,
    },

    /// A cross-window message from a related context.
    PostMessage {
        /// Sending context.
        source_id: ContentsId,
        /// Message payload, untouched.
        message: Value,
        /// Origin the sender asserted for itself.
        source_origin: Option<String>,
    },
}

impl InternalMessage {
    /// Bridge channel the message is sent on.
    #[must_use]
    pub fn channel(&self) -> String {
        match self {
            Self::WindowClosed { guest_id } => format!("{WINDOW_CLOSED_CHANNEL_PREFIX}{guest_id}"),
            Self::PostMessage { .. } => POSTMESSAGE_CHANNEL.to_string(),
        }
    }

    /// Positional arguments of the message.
    #[must_use]
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::WindowClosed { .. } => Vec::new(),
            Self::PostMessage {
                source_id,
                message,
                source_origin,
            } => vec![json!(source_id), message.clone(), json!(source_origin)],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_closed_channel_carries_id() {
        let message = InternalMessage::WindowClosed {
            guest_id: ContentsId::new(17).unwrap(),
        };
        assert_eq!(message.channel(), "GUEST_WINDOW_MANAGER_WINDOW_CLOSED_17");
        assert!(message.args().is_empty());
    }

    #[test]
    fn test_postmessage_args() {
        let message = InternalMessage::PostMessage {
            source_id: ContentsId::new(3).unwrap(),
            message: json!({ "hello": "world" }),
            source_origin: Some("https://a.test".into()),
        };
        assert_eq!(message.channel(), POSTMESSAGE_CHANNEL);
        assert_eq!(
            message.args(),
            vec![json!(3), json!({ "hello": "world" }), json!("https://a.test")]
        );
    }

    #[test]
    fn test_postmessage_without_source_origin() {
        let message = InternalMessage::PostMessage {
            source_id: ContentsId::new(3).unwrap(),
            message: json!("hi"),
            source_origin: None,
        };
        assert_eq!(message.args()[2], Value::Null);
    }

    #[test]
    fn test_disposition_serde() {
        assert_eq!(serde_json::to_value(Disposition::NewWindow).unwrap(), json!("new-window"));
        let parsed: Disposition = serde_json::from_value(json!("foreground-tab")).unwrap();
        assert_eq!(parsed, Disposition::ForegroundTab);
    }

    #[test]
    fn test_closure_is_hook() {
        let hook = |_: &NewWindowEvent| NewWindowDecision::Cancel;
        let event = NewWindowEvent {
            sender: ContentsId::new(1).unwrap(),
            url: "about:blank".into(),
            frame_name: String::new(),
            disposition: Disposition::NewWindow,
            options: WindowOptions::new(),
            additional_features: Vec::new(),
            referrer: Referrer::default(),
            post_body: None,
        };
        assert_eq!(hook.on_new_window(&event), NewWindowDecision::Cancel);
    }
}
