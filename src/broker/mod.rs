//! The guest-window broker.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | [`BrokerBuilder`] fluent configuration |
//! | `core` | [`Broker`] coordinator and shared state |
//! | `dispatch` | Access-checked message-bridge endpoints |
//! | `lifecycle` | Guest attachment and close propagation |
//! | `open` | `window.open` handling |
//! | `options` | [`BrokerOptions`] defaults |
//! | `registry` | [`FrameRegistry`] frame name service |

// ============================================================================
// Submodules
// ============================================================================

/// Broker builder.
pub mod builder;

/// Broker coordinator.
pub mod core;

/// Bridge dispatch.
mod dispatch;

/// Guest lifecycle wiring.
mod lifecycle;

/// Window-open handling.
pub mod open;

/// Broker options.
pub mod options;

/// Frame name registry.
pub mod registry;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::BrokerBuilder;
pub use core::Broker;
pub use open::{OpenOutcome, OpenRequest};
pub use options::{BrokerOptions, DEFAULT_BLANK_URL};
pub use registry::FrameRegistry;
