//! Guest Window Broker - Privileged mediation of guest window creation.
//!
//! This library sits in a trusted process between rendering contexts
//! ("embedders") and the windows they spawn ("guests"). Embedders cannot
//! create or control windows directly; every such request arrives over a
//! message bridge and passes an access policy first.
//!
//! # Architecture
//!
//! The broker follows a mediator model:
//!
//! - **Host**: owns windows and contents, implements [`Host`]
//! - **Broker**: holds id mappings only, decides what the host may be asked
//!   to do on an embedder's behalf
//!
//! Key design principles:
//!
//! - Guests never receive a security preference stronger than their embedder's
//! - Who may touch whom is derived from opener lineage and origin, never cached
//! - Each bridge endpoint has a closed allow-list of methods
//! - Bridge ids outside the host id range are refused, not truncated
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use guest_window_broker::{Broker, Channel, Request, Result};
//!
//! async fn run(host: Arc<dyn guest_window_broker::Host>) -> Result<()> {
//!     let broker = Broker::builder().host(host).build()?;
//!
//!     // A rendering context asks to focus a window it opened
//!     let request = Request::new(Channel::WindowMethod, vec![12.into(), "focus".into()]);
//!     let response = broker.handle(sender, request).await;
//!     assert!(response.is_success());
//!
//!     // The host reports lifecycle signals
//!     broker.on_guest_closed(guest);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`broker`] | [`Broker`], its builder, options and frame registry |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`host`] | The [`Host`] trait and the snapshots it returns |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Bridge envelope, allow-lists and events |
//! | [`window`] | Window options, merge and relationship policy |

// ============================================================================
// Modules
// ============================================================================

/// Broker coordinator, builder and frame registry.
///
/// Use [`Broker::builder()`] to create a configured broker instance.
pub mod broker;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Host environment interface.
pub mod host;

/// Type-safe identifiers for host objects.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Message-bridge protocol types.
pub mod protocol;

/// Window configuration and access policy.
pub mod window;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Broker types
pub use broker::{Broker, BrokerBuilder, BrokerOptions, FrameRegistry, OpenOutcome, OpenRequest};

// Error types
pub use error::{Error, Result};

// Host types
pub use host::{ContentsInfo, ContentsKind, GuestHandle, Host, ParsedFeatures};

// Identifier types
pub use identifiers::{ContentsId, RequestId, WindowId};

// Protocol types
pub use protocol::{
    Channel, Disposition, InternalMessage, NewWindowDecision, NewWindowEvent, NewWindowHook,
    Request, Response,
};

// Window types
pub use window::{WebPreferences, WindowOptions};
