//! Builder pattern for broker configuration.
//!
//! Provides a fluent API for configuring and creating [`Broker`] instances.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use guest_window_broker::{Broker, FrameRegistry, NewWindowDecision, NewWindowEvent};
//!
//! let broker = Broker::builder()
//!     .host(Arc::new(MyHost::new()))
//!     .frame_registry(Arc::new(FrameRegistry::new()))
//!     .new_window_hook(|_: &NewWindowEvent| NewWindowDecision::Proceed)
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::protocol::NewWindowHook;

use super::core::Broker;
use super::options::BrokerOptions;
use super::registry::FrameRegistry;

// ============================================================================
// BrokerBuilder
// ============================================================================

/// Builder for configuring a [`Broker`] instance.
///
/// Use [`Broker::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct BrokerBuilder {
    /// Host environment.
    host: Option<Arc<dyn Host>>,
    /// Shared frame name registry.
    frame_registry: Option<Arc<FrameRegistry>>,
    /// Application hook consulted before guest creation.
    hook: Option<Arc<dyn NewWindowHook>>,
    /// Tunable defaults.
    options: BrokerOptions,
}

impl fmt::Debug for BrokerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerBuilder")
            .field("has_host", &self.host.is_some())
            .field("frame_registry", &self.frame_registry)
            .field("has_hook", &self.hook.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// BrokerBuilder Implementation
// ============================================================================

impl BrokerBuilder {
    /// Creates a new broker builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host environment.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Shares an existing frame name registry.
    ///
    /// A fresh registry is created when none is set.
    #[inline]
    #[must_use]
    pub fn frame_registry(mut self, registry: Arc<FrameRegistry>) -> Self {
        self.frame_registry = Some(registry);
        self
    }

    /// Sets the new-window hook.
    #[inline]
    #[must_use]
    pub fn new_window_hook(mut self, hook: impl NewWindowHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Sets the broker options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: BrokerOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the broker with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no host is set
    /// - [`Error::Config`] if the options fail validation
    pub fn build(self) -> Result<Broker> {
        let host = self.validate_host()?;
        self.options.validate()?;

        let frames = self.frame_registry.unwrap_or_default();
        Ok(Broker::new(host, frames, self.hook, self.options))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl BrokerBuilder {
    /// Validates the host configuration.
    fn validate_host(&self) -> Result<Arc<dyn Host>> {
        self.host.clone().ok_or_else(|| {
            Error::config(
                "Host is required. Use .host() to set it.\n\
                 Example: Broker::builder().host(Arc::new(my_host))",
            )
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
