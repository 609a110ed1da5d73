//! Window configuration and policy primitives.
//!
//! Everything in this module is pure: no host calls except the origin
//! primitive used by [`Relations`].
//!
//! | Module | Description |
//! |--------|-------------|
//! | `options` | [`WindowOptions`] object map with `webPreferences` |
//! | `merge` | Cycle-safe back-fill of missing keys |
//! | `preferences` | [`WebPreferences`] and the inherited security set |
//! | `inherit` | Resolution of guest options against the embedder |
//! | `relation` | Opener, scriptable and full-trust queries |
//! | `post_data` | POST body content-type classification |

// ============================================================================
// Submodules
// ============================================================================

/// Option inheritance from embedder to guest.
pub mod inherit;

/// Deep merge of window configuration.
pub mod merge;

/// Window configuration map.
pub mod options;

/// POST body classification.
pub mod post_data;

/// Resolved preferences and inherited security flags.
pub mod preferences;

/// Relationship oracle.
pub mod relation;

// ============================================================================
// Re-exports
// ============================================================================

pub use inherit::inherit_options;
pub use merge::merge_options;
pub use options::{TITLE_KEY, TYPE_KEY, WEB_CONTENTS_KEY, WEB_PREFERENCES_KEY, WindowOptions};
pub use post_data::{
    ContentTypeFormat, MULTIPART_CONTENT_TYPE, PostBody, PostDataChunk, URL_ENCODED_CONTENT_TYPE,
};
pub use preferences::{INHERITED_PREFERENCES, InheritedPreference, WebPreferences, is_truthy};
pub use relation::Relations;
