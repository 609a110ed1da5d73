//! Guest lifecycle wiring.
//!
//! Each guest gets one [`GuestLink`] tying it to its embedder. Two host
//! signals drive the link:
//!
//! | Signal | Entry point | Effect |
//! |--------|-------------|--------|
//! | Embedder's rendering content gone | [`Broker::on_render_view_deleted`] | Destroy the guest, mute its close notice |
//! | Guest closed, by any means | [`Broker::on_guest_closed`] | Notify the embedder unless muted, drop the link and frame name |
//!
//! Whichever signal arrives first wins; the second finds nothing left to do.
//! The link table lock is released before the host is called, so a host that
//! fires the guest's close signal from inside `destroy_window` re-enters
//! safely.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, info};

use crate::host::GuestHandle;
use crate::identifiers::{ContentsId, WindowId};
use crate::protocol::InternalMessage;

use super::core::Broker;

// ============================================================================
// GuestLink
// ============================================================================

/// What the broker remembers about a live guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GuestLink {
    /// Contents that opened the guest.
    pub embedder: ContentsId,

    /// The guest's top-level window.
    pub window: WindowId,

    /// Frame name the guest registered under, if any.
    pub frame_name: Option<String>,

    /// Whether the embedder hears about the guest closing.
    pub notify_embedder: bool,
}

// ============================================================================
// Broker - Lifecycle
// ============================================================================

impl Broker {
    /// Ties `guest` to `embedder` and returns the guest id.
    ///
    /// A non-empty `frame_name` is registered for reuse until the guest
    /// closes. Setting up an already tracked guest replaces its link and
    /// releases the frame name the old link held.
    pub fn setup_guest(
        &self,
        embedder: ContentsId,
        frame_name: &str,
        guest: GuestHandle,
    ) -> ContentsId {
        let frame_name = (!frame_name.is_empty()).then(|| frame_name.to_string());
        if let Some(name) = &frame_name {
            self.inner.frames.insert(name.clone(), guest.contents);
        }

        let link = GuestLink {
            embedder,
            window: guest.window,
            frame_name: frame_name.clone(),
            notify_embedder: true,
        };
        let previous = self.inner.links.lock().insert(guest.contents, link);

        // a re-attached guest gives up the name it held before
        if let Some(old) = previous.and_then(|link| link.frame_name)
            && frame_name.as_deref() != Some(old.as_str())
        {
            self.inner.frames.remove_if(&old, guest.contents);
        }

        info!(
            guest = %guest.contents,
            window = %guest.window,
            embedder = %embedder,
            "Guest attached"
        );

        guest.contents
    }

    /// Handles the embedder's rendering content going away.
    ///
    /// Destroys every guest `embedder` opened. Those guests' close signals
    /// will not notify the departed embedder. Returns the number of guests
    /// destroyed.
    pub fn on_render_view_deleted(&self, embedder: ContentsId) -> usize {
        let doomed: Vec<(ContentsId, WindowId)> = {
            let mut links = self.inner.links.lock();
            links
                .iter_mut()
                .filter(|(_, link)| link.embedder == embedder)
                .map(|(guest, link)| {
                    link.notify_embedder = false;
                    (*guest, link.window)
                })
                .collect()
        };

        debug!(embedder = %embedder, count = doomed.len(), "Embedder gone, destroying guests");

        for (guest, window) in &doomed {
            if let Err(e) = self.host().destroy_window(*window) {
                debug!(guest = %guest, window = %window, error = %e, "Error destroying guest");
            }
        }

        doomed.len()
    }

    /// Handles a guest closing.
    ///
    /// Drops the guest's link and frame name, then notifies the embedder
    /// unless the close was a cascade from the embedder's own teardown.
    /// Returns `true` if the guest was tracked.
    pub fn on_guest_closed(&self, guest: ContentsId) -> bool {
        let Some(link) = self.inner.links.lock().remove(&guest) else {
            debug!(guest = %guest, "Close signal for untracked guest");
            return false;
        };

        if let Some(name) = &link.frame_name {
            self.inner.frames.remove_if(name, guest);
        }

        info!(guest = %guest, embedder = %link.embedder, "Guest closed");

        if link.notify_embedder {
            let message = InternalMessage::WindowClosed { guest_id: guest };
            if let Err(e) = self.host().send_internal(link.embedder, message) {
                debug!(embedder = %link.embedder, error = %e, "Error sending close notice");
            }
        }

        true
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    use crate::host::Host;
    use crate::testing::MockHost;

    fn id(raw: u32) -> ContentsId {
        ContentsId::new(raw).unwrap()
    }

    fn handle(window: u32, contents: u32) -> GuestHandle {
        GuestHandle::new(WindowId::new(window).unwrap(), id(contents))
    }

    fn broker(host: &Arc<MockHost>) -> Broker {
        Broker::builder().host(host.clone()).build().expect("build")
    }

    #[test]
    fn test_setup_returns_guest_id() {
        let host = Arc::new(MockHost::new());
        let broker = broker(&host);
        assert_eq!(broker.setup_guest(id(1), "", handle(10, 2)), id(2));
        assert!(broker.guest_for_frame("").is_none());
    }

    #[test]
    fn test_user_close_notifies_embedder_once() {
        let host = Arc::new(MockHost::new());
        let broker = broker(&host);
        broker.setup_guest(id(1), "popup", handle(10, 2));

        assert!(broker.on_guest_closed(id(2)));
        assert!(!broker.on_guest_closed(id(2)));

        let messages = host.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, id(1));
        assert_eq!(messages[0].1.channel(), "GUEST_WINDOW_MANAGER_WINDOW_CLOSED_2");
        assert!(broker.guest_for_frame("popup").is_none());
    }

    #[test]
    fn test_user_close_then_embedder_gone() {
        let host = Arc::new(MockHost::new());
        let broker = broker(&host);
        broker.setup_guest(id(1), "", handle(10, 2));

        broker.on_guest_closed(id(2));
        assert_eq!(broker.on_render_view_deleted(id(1)), 0);

        assert!(host.destroyed().is_empty());
        assert_eq!(host.messages().len(), 1);
    }

    #[test]
    fn test_embedder_gone_then_guest_close() {
        let host = Arc::new(MockHost::new());
        let broker = broker(&host);
        broker.setup_guest(id(1), "a", handle(10, 2));
        broker.setup_guest(id(1), "", handle(11, 3));
        broker.setup_guest(id(5), "", handle(12, 6));

        assert_eq!(broker.on_render_view_deleted(id(1)), 2);
        let mut destroyed = host.destroyed();
        destroyed.sort();
        assert_eq!(destroyed, vec![WindowId::new(10).unwrap(), WindowId::new(11).unwrap()]);

        broker.on_guest_closed(id(2));
        broker.on_guest_closed(id(3));

        assert!(host.messages().is_empty());
        assert_eq!(broker.guest_count(), 1);
        assert!(broker.guest_for_frame("a").is_none());
    }

    #[test]
    fn test_reentrant_destroy_does_not_deadlock() {
        let host = Arc::new(MockHost::new());
        let broker = broker(&host);
        host.close_on_destroy(&broker);
        host.add_window(WindowId::new(10).unwrap(), id(2), Default::default());
        broker.setup_guest(id(1), "", handle(10, 2));

        assert_eq!(broker.on_render_view_deleted(id(1)), 1);
        assert_eq!(broker.guest_count(), 0);
        assert!(host.messages().is_empty());
        assert!(host.contents(id(2)).is_none());
    }

    #[test]
    fn test_stale_close_keeps_newer_frame_owner() {
        let host = Arc::new(MockHost::new());
        let broker = broker(&host);
        broker.setup_guest(id(1), "popup", handle(10, 2));
        broker.setup_guest(id(1), "popup", handle(11, 3));

        broker.on_guest_closed(id(2));
        assert_eq!(broker.guest_for_frame("popup"), Some(id(3)));
    }

    #[test]
    fn test_reattach_releases_previous_frame_name() {
        let host = Arc::new(MockHost::new());
        let broker = broker(&host);
        broker.setup_guest(id(1), "a", handle(10, 2));
        broker.setup_guest(id(1), "b", handle(10, 2));

        assert!(broker.guest_for_frame("a").is_none());
        assert_eq!(broker.guest_for_frame("b"), Some(id(2)));

        broker.on_guest_closed(id(2));
        assert!(broker.guest_for_frame("a").is_none());
        assert!(broker.guest_for_frame("b").is_none());
    }
}
