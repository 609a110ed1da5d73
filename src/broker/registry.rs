//! Frame name registry.
//!
//! Maps a caller-supplied frame name to the guest currently holding it.
//! The registry is a shared service: several brokers may point at one
//! instance, and it outlives any of them.

// ============================================================================
// Imports
// ============================================================================

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::identifiers::ContentsId;

// ============================================================================
// FrameRegistry
// ============================================================================

/// Frame name to guest mapping, at most one guest per name.
#[derive(Debug, Default)]
pub struct FrameRegistry {
    names: Mutex<FxHashMap<String, ContentsId>>,
}

impl FrameRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `guest`, returning the guest it replaced.
    pub fn insert(&self, name: impl Into<String>, guest: ContentsId) -> Option<ContentsId> {
        self.names.lock().insert(name.into(), guest)
    }

    /// Returns the guest bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ContentsId> {
        self.names.lock().get(name).copied()
    }

    /// Unbinds `name` only if it still maps to `guest`.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove_if(&self, name: &str, guest: ContentsId) -> bool {
        let mut names = self.names.lock();
        if names.get(name) == Some(&guest) {
            names.remove(name);
            true
        } else {
            false
        }
    }

    /// Removes every binding.
    pub fn clear(&self) {
        self.names.lock().clear();
    }

    /// Number of bound names.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.lock().len()
    }

    /// Returns `true` if no name is bound.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.lock().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
