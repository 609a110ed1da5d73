//! Deep merge of window configuration.
//!
//! Rules, applied to every key of the parent:
//!
//! - `type` is never copied.
//! - A key already present in the child is left alone, except
//!   `webPreferences`, which is always descended into so that nested
//!   security flags are back-filled.
//! - Object values recurse into a (possibly new) child object; every other
//!   value, arrays and `null` included, is copied as is.
//!
//! Each parent object is tracked while its keys are being merged. Meeting
//! the same parent again further down the same chain skips that branch, and
//! a parent leaves the set once its recursion returns, so siblings that
//! carry equal sub-objects are merged independently.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use super::options::{TYPE_KEY, WEB_PREFERENCES_KEY};

// ============================================================================
// Types
// ============================================================================

/// Parent objects on the current merge chain, by address.
type Visited = FxHashSet<*const Map<String, Value>>;

// ============================================================================
// Public API
// ============================================================================

/// Copies keys of `parent` into `child` where `child` lacks them.
pub fn merge_options(child: &mut Map<String, Value>, parent: &Map<String, Value>) {
    let mut visited = Visited::default();
    merge_chain(child, parent, &mut visited);
}

// ============================================================================
// Internal
// ============================================================================

fn merge_chain(child: &mut Map<String, Value>, parent: &Map<String, Value>, visited: &mut Visited) {
    let marker = parent as *const Map<String, Value>;
    if !visited.insert(marker) {
        return;
    }

    for (key, value) in parent {
        if key == TYPE_KEY {
            continue;
        }
        if child.contains_key(key) && (key != WEB_PREFERENCES_KEY || !value.is_object()) {
            continue;
        }

        match value {
            Value::Object(nested) => {
                let slot = child
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(target) = slot {
                    merge_chain(target, nested, visited);
                }
            }
            other => {
                child.insert(key.clone(), other.clone());
            }
        }
    }

    visited.remove(&marker);
}

// ============================================================================
// Tests
// ============================================================================
