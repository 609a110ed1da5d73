//! Message-bridge protocol types.
//!
//! This module defines what crosses the boundary between rendering contexts
//! and the broker.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Context → Broker | Call on one of five channels |
//! | `Response` | Broker → Context | Result or failure of the call |
//! | `InternalMessage` | Broker → Context | Close and postMessage notices |
//! | `NewWindowEvent` | Broker → Application | Hook input before guest creation |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Allow-listed methods by endpoint family |
//! | `event` | Hook and internal message types |
//! | `request` | Request and Response types |

// ============================================================================
// Submodules
// ============================================================================

/// Allow-listed method definitions.
pub mod command;

/// Event message types.
pub mod event;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{ContentsMethod, SyncContentsMethod, WindowMethod};
pub use event::{
    Disposition, InternalMessage, NewWindowDecision, NewWindowEvent, NewWindowHook,
    POSTMESSAGE_CHANNEL, WINDOW_CLOSED_CHANNEL_PREFIX,
};
pub use request::{Channel, Request, Response, ResponseType};
