//! Who may act on whom.
//!
//! Every predicate reads live state from the [`ContentsInfo`] snapshots it
//! is handed, and origin comparison is delegated to the host on each call.
//!
//! | Predicate | Holds when |
//! |-----------|------------|
//! | [`Relations::is_child_window`] | target's `openerId` is the sender |
//! | [`Relations::is_related_window`] | child in either direction |
//! | [`Relations::is_scriptable_window`] | related and same-origin |
//! | [`Relations::is_full_trust`] | sender has `nodeIntegration: true` |
//! | [`Relations::can_access`] | child, scriptable, or full trust |

// ============================================================================
// Imports
// ============================================================================

use crate::host::{ContentsInfo, Host};

// ============================================================================
// Relations
// ============================================================================

/// Relationship queries backed by the host's origin primitive.
#[derive(Clone, Copy)]
pub struct Relations<'a> {
    host: &'a dyn Host,
}

impl<'a> Relations<'a> {
    /// Creates a relationship oracle over `host`.
    #[inline]
    #[must_use]
    pub fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }

    /// `target` was opened by `sender`.
    #[must_use]
    pub fn is_child_window(&self, sender: &ContentsInfo, target: &ContentsInfo) -> bool {
        target.preferences.is_opened_by(sender.id)
    }

    /// One of the two opened the other.
    #[must_use]
    pub fn is_related_window(&self, sender: &ContentsInfo, target: &ContentsInfo) -> bool {
        self.is_child_window(sender, target) || self.is_child_window(target, sender)
    }

    /// Related, and currently on the same origin.
    #[must_use]
    pub fn is_scriptable_window(&self, sender: &ContentsInfo, target: &ContentsInfo) -> bool {
        self.is_related_window(sender, target) && self.host.is_same_origin(&sender.url, &target.url)
    }

    /// Sender runs with node-style privileges.
    #[must_use]
    pub fn is_full_trust(&self, sender: &ContentsInfo) -> bool {
        sender.preferences.node_integration()
    }

    /// Sender may control `target`.
    #[must_use]
    pub fn can_access(&self, sender: &ContentsInfo, target: &ContentsInfo) -> bool {
        self.is_child_window(sender, target)
            || self.is_scriptable_window(sender, target)
            || self.is_full_trust(sender)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::host::ContentsKind;
    use crate::identifiers::ContentsId;
    use crate::testing::MockHost;
    use crate::window::WebPreferences;

    fn contents(id: u32, url: &str, prefs: WebPreferences) -> ContentsInfo {
        ContentsInfo::new(ContentsId::new(id).unwrap(), ContentsKind::Window, url)
            .with_preferences(prefs)
    }

    fn opened_by(id: u32) -> WebPreferences {
        WebPreferences::new().with("openerId", id)
    }

    #[test]
    fn test_unrelated() {
        let host = MockHost::new();
        let rel = Relations::new(&host);
        let a = contents(1, "https://a.test", WebPreferences::new());
        let b = contents(2, "https://a.test", WebPreferences::new());

        assert!(!rel.is_child_window(&a, &b));
        assert!(!rel.is_related_window(&a, &b));
        assert!(!rel.is_scriptable_window(&a, &b));
        assert!(!rel.can_access(&a, &b));
    }

    #[test]
    fn test_child_cross_origin() {
        let host = MockHost::new();
        let rel = Relations::new(&host);
        let opener = contents(1, "https://a.test", WebPreferences::new());
        let child = contents(2, "https://b.test", opened_by(1));

        assert!(rel.is_child_window(&opener, &child));
        assert!(rel.can_access(&opener, &child));
        assert!(rel.is_related_window(&opener, &child));
        assert!(rel.is_related_window(&child, &opener));
        assert!(!rel.is_scriptable_window(&child, &opener));
        assert!(!rel.can_access(&child, &opener));
    }

    #[test]
    fn test_child_reaching_same_origin_opener() {
        let host = MockHost::new();
        let rel = Relations::new(&host);
        let opener = contents(1, "https://a.test/app", WebPreferences::new());
        let child = contents(2, "https://a.test/popup", opened_by(1));

        assert!(!rel.is_child_window(&child, &opener));
        assert!(rel.is_scriptable_window(&child, &opener));
        assert!(rel.can_access(&child, &opener));
    }

    #[test]
    fn test_siblings_are_not_related() {
        let host = MockHost::new();
        let rel = Relations::new(&host);
        let first = contents(2, "https://a.test", opened_by(1));
        let second = contents(3, "https://a.test", opened_by(1));

        assert!(!rel.is_related_window(&first, &second));
        assert!(!rel.can_access(&first, &second));
    }

    #[test]
    fn test_full_trust_sender() {
        let host = MockHost::new();
        let rel = Relations::new(&host);
        let trusted = contents(
            1,
            "file:///app/index.html",
            WebPreferences::new().with("nodeIntegration", true),
        );
        let stranger = contents(9, "https://evil.test", WebPreferences::new());

        assert!(rel.is_full_trust(&trusted));
        assert!(rel.can_access(&trusted, &stranger));
        assert!(!rel.is_related_window(&trusted, &stranger));
        assert!(!rel.can_access(&stranger, &trusted));
    }

    #[test]
    fn test_navigation_changes_answer() {
        let host = MockHost::new();
        let rel = Relations::new(&host);
        let opener = contents(1, "https://a.test", WebPreferences::new());
        let mut child = contents(2, "https://a.test", opened_by(1));
        assert!(rel.is_scriptable_window(&child, &opener));

        child.url = "https://elsewhere.test".into();
        assert!(!rel.is_scriptable_window(&child, &opener));
    }
}
