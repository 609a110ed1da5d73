//! Broker configuration.
//!
//! # Example
//!
//! ```
//! use guest_window_broker::BrokerOptions;
//! use guest_window_broker::host::ReferrerPolicy;
//!
//! let options = BrokerOptions::new()
//!     .with_blank_url("about:blank")
//!     .with_referrer_policy(ReferrerPolicy::NoReferrer);
//!
//! assert!(options.validate().is_ok());
//! ```

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::error::{Error, Result};
use crate::host::{Referrer, ReferrerPolicy};

// ============================================================================
// Constants
// ============================================================================

/// Page loaded when `window.open` is called without a URL.
pub const DEFAULT_BLANK_URL: &str = "about:blank";

// ============================================================================
// BrokerOptions
// ============================================================================

/// Tunable defaults for the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerOptions {
    /// URL substituted for an empty or missing open URL.
    pub blank_url: String,

    /// Policy of the referrer attached to raw `window.open` loads.
    pub referrer_policy: ReferrerPolicy,
}

impl Default for BrokerOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl BrokerOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            blank_url: DEFAULT_BLANK_URL.to_string(),
            referrer_policy: ReferrerPolicy::Default,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl BrokerOptions {
    /// Sets the blank page URL.
    #[inline]
    #[must_use]
    pub fn with_blank_url(mut self, url: impl Into<String>) -> Self {
        self.blank_url = url.into();
        self
    }

    /// Sets the default referrer policy.
    #[inline]
    #[must_use]
    pub fn with_referrer_policy(mut self, policy: ReferrerPolicy) -> Self {
        self.referrer_policy = policy;
        self
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl BrokerOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the blank URL does not parse.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.blank_url).map_err(|e| {
            Error::config(format!("Invalid blank URL '{}': {e}", self.blank_url))
        })?;
        Ok(())
    }

    /// Empty referrer carrying the configured policy.
    #[inline]
    #[must_use]
    pub fn default_referrer(&self) -> Referrer {
        Referrer::new("", self.referrer_policy)
    }
}

// ============================================================================
// Tests
// ============================================================================
