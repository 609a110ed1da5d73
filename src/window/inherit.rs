//! Resolution of a guest's options against its embedder.
//!
//! Order matters:
//!
//! 1. structural merge (whole window options for top-level embedders,
//!    `webPreferences` only for embedded views),
//! 2. forced copy of the security set the embedder actually holds,
//! 3. the `openerId` lineage tag when the embedder routes `window.open`
//!    through the broker.
//!
//! Step 2 runs after the merge so a request can never keep a value the
//! embedder has already given up.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::host::{ContentsInfo, WindowState};

use super::merge::merge_options;
use super::options::WindowOptions;
use super::preferences::names;

// ============================================================================
// Public API
// ============================================================================

/// Merges `options` with what `embedder` is running with.
///
/// `owner` is the live state of the embedder's window, when it has one.
pub fn inherit_options(
    embedder: &ContentsInfo,
    owner: Option<WindowState>,
    options: &mut WindowOptions,
) {
    options.web_preferences_mut();

    match &embedder.creation_options {
        Some(creation) => {
            let parent = match owner {
                Some(state) => {
                    // visibility is live, creation options are not
                    let mut parent = state.bounds.to_options();
                    parent.extend(creation.as_map().clone());
                    parent.insert("show".into(), Value::Bool(state.visible));
                    parent
                }
                None => creation.as_map().clone(),
            };
            options.inherit_from(&parent);
        }
        None => {
            merge_options(options.web_preferences_mut(), embedder.preferences.as_map());
        }
    }

    let child = options.web_preferences_mut();
    embedder.preferences.stamp_inherited(child);

    if !embedder.preferences.native_window_open() {
        child.insert(names::OPENER_ID.to_string(), embedder.id.into());
    }
}

// ============================================================================
// Tests
// ============================================================================
