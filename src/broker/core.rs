//! Guest-window broker coordinator.
//!
//! The [`Broker`] owns no windows. It holds the id mappings that tie guests
//! to their embedders and routes every window operation through the
//! [`Host`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use guest_window_broker::Broker;
//!
//! let broker = Broker::builder().host(Arc::new(MyHost::new())).build()?;
//!
//! // From the message bridge:
//! let response = broker.handle(sender, request).await;
//!
//! // From the host's lifecycle signals:
//! broker.on_guest_closed(guest);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::error::{Error, Result};
use crate::host::{ContentsInfo, Host};
use crate::identifiers::ContentsId;
use crate::protocol::NewWindowHook;
use crate::window::Relations;

use super::builder::BrokerBuilder;
use super::lifecycle::GuestLink;
use super::options::BrokerOptions;
use super::registry::FrameRegistry;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the broker.
pub(crate) struct BrokerInner {
    /// Host environment.
    pub host: Arc<dyn Host>,

    /// Frame name registry, possibly shared with other brokers.
    pub frames: Arc<FrameRegistry>,

    /// Application hook consulted before guest creation.
    pub hook: Option<Arc<dyn NewWindowHook>>,

    /// Tunable defaults.
    pub options: BrokerOptions,

    /// Live guests keyed by their contents id.
    pub links: Mutex<FxHashMap<ContentsId, GuestLink>>,
}

// ============================================================================
// Broker
// ============================================================================

/// Guest-window broker.
///
/// The broker is responsible for:
/// - Resolving new guest options against their embedder
/// - Reusing named guests
/// - Propagating close between embedders and guests
/// - Access-checking every bridge call before it reaches the host
///
/// Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct Broker {
    /// Shared inner state.
    pub(crate) inner: Arc<BrokerInner>,
}

// ============================================================================
// Broker - Display
// ============================================================================

impl fmt::Debug for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broker")
            .field("options", &self.inner.options)
            .field("guest_count", &self.guest_count())
            .field("frame_count", &self.inner.frames.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Broker - Public API
// ============================================================================

impl Broker {
    /// Creates a configuration builder for the broker.
    #[inline]
    #[must_use]
    pub fn builder() -> BrokerBuilder {
        BrokerBuilder::new()
    }

    /// Returns the broker options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &BrokerOptions {
        &self.inner.options
    }

    /// Returns the frame name registry.
    #[inline]
    #[must_use]
    pub fn frame_registry(&self) -> &Arc<FrameRegistry> {
        &self.inner.frames
    }

    /// Returns the guest currently holding `frame_name`.
    #[must_use]
    pub fn guest_for_frame(&self, frame_name: &str) -> Option<ContentsId> {
        self.inner.frames.get(frame_name)
    }

    /// Returns the number of guests tracked by this broker.
    #[inline]
    #[must_use]
    pub fn guest_count(&self) -> usize {
        self.inner.links.lock().len()
    }

    /// Returns the embedder that opened `guest`, if it is still tracked.
    #[must_use]
    pub fn embedder_of(&self, guest: ContentsId) -> Option<ContentsId> {
        self.inner.links.lock().get(&guest).map(|link| link.embedder)
    }

    /// Forgets every guest and clears the frame registry.
    ///
    /// Windows stay open; the broker simply stops tracking them.
    pub fn shutdown(&self) {
        let guests = {
            let mut links = self.inner.links.lock();
            let count = links.len();
            links.clear();
            count
        };
        self.inner.frames.clear();

        info!(guests, "Broker shut down");
    }
}

// ============================================================================
// Broker - Internal
// ============================================================================

impl Broker {
    /// Creates a broker from validated parts.
    pub(crate) fn new(
        host: Arc<dyn Host>,
        frames: Arc<FrameRegistry>,
        hook: Option<Arc<dyn NewWindowHook>>,
        options: BrokerOptions,
    ) -> Self {
        let inner = BrokerInner {
            host,
            frames,
            hook,
            options,
            links: Mutex::new(FxHashMap::default()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the host.
    #[inline]
    pub(crate) fn host(&self) -> &dyn Host {
        self.inner.host.as_ref()
    }

    /// Relationship queries against the host.
    #[inline]
    pub(crate) fn relations(&self) -> Relations<'_> {
        Relations::new(self.host())
    }

    /// Looks up a live contents.
    pub(crate) fn lookup(&self, id: ContentsId) -> Result<ContentsInfo> {
        self.host()
            .contents(id)
            .ok_or_else(|| Error::contents_not_found(id))
    }
}

// ============================================================================
// Tests
// ============================================================================
