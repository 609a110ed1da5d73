//! Type-safe identifiers for host objects and bridge requests.
//!
//! Newtype wrappers prevent mixing a window id with a contents id at
//! compile time. Host ids are non-zero 32-bit integers; anything arriving
//! over the message bridge goes through [`ContentsId::from_value`], which
//! refuses values outside that range instead of truncating them.
//!
//! | Type | Inner | Source |
//! |------|-------|--------|
//! | [`ContentsId`] | `NonZeroU32` | Host rendering contents |
//! | [`WindowId`] | `NonZeroU32` | Host top-level window |
//! | [`RequestId`] | `Uuid` | Bridge request correlation |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// ContentsId
// ============================================================================

/// Identifier of a live rendering context (embedder or guest contents).
///
/// This is the opaque window id exchanged over the message bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentsId(NonZeroU32);

impl ContentsId {
    /// Creates a contents id, returning `None` for zero.
    #[inline]
    #[must_use]
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Decodes a contents id from an untrusted JSON value.
    ///
    /// Only non-negative integers in `1..=u32::MAX` are accepted.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let raw = value.as_u64()?;
        let raw = u32::try_from(raw).ok()?;
        Self::new(raw)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns `true` if `value` is a JSON number equal to this id.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        value.as_u64() == Some(u64::from(self.get()))
    }
}

impl fmt::Display for ContentsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContentsId> for Value {
    fn from(id: ContentsId) -> Self {
        Value::from(id.get())
    }
}

// ============================================================================
// WindowId
// ============================================================================

/// Identifier of a host top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(NonZeroU32);

impl WindowId {
    /// Creates a window id, returning `None` for zero.
    #[inline]
    #[must_use]
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// RequestId
// ============================================================================

/// Correlation id of a message-bridge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh random request id.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
