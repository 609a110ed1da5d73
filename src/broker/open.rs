//! Window-open handling.
//!
//! Two entry points feed one flow:
//!
//! | Entry | Caller | Notes |
//! |-------|--------|-------|
//! | [`Broker::open_raw`] | Rendering context over the bridge | Features string parsed by the host |
//! | [`Broker::open`] | Host, with fully parsed options | Carries referrer, disposition and POST data |
//!
//! The flow is: frame name reuse, option inheritance, the new-window hook,
//! then either a substitute guest, suppression, or a freshly created one.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::host::{ContentsInfo, LoadOptions, Referrer};
use crate::identifiers::ContentsId;
use crate::protocol::{Disposition, NewWindowDecision, NewWindowEvent};
use crate::window::{PostBody, PostDataChunk, TITLE_KEY, WindowOptions, inherit_options};

use super::core::Broker;

// ============================================================================
// OpenRequest
// ============================================================================

/// A fully parsed request for a new guest.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRequest {
    /// URL to load.
    pub url: String,
    /// Referrer for the load.
    pub referrer: Referrer,
    /// Frame name; empty for none.
    pub frame_name: String,
    /// Requested disposition.
    pub disposition: Disposition,
    /// Requested window options.
    pub options: WindowOptions,
    /// Features the parser did not recognize.
    pub additional_features: Vec<String>,
    /// POST body chunks, for form submissions.
    pub post_data: Option<Vec<PostDataChunk>>,
}

impl OpenRequest {
    /// Creates a request for `url` with every other field defaulted.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            referrer: Referrer::default(),
            frame_name: String::new(),
            disposition: Disposition::NewWindow,
            options: WindowOptions::new(),
            additional_features: Vec::new(),
            post_data: None,
        }
    }

    /// Sets the referrer.
    #[must_use]
    pub fn with_referrer(mut self, referrer: Referrer) -> Self {
        self.referrer = referrer;
        self
    }

    /// Sets the frame name.
    #[must_use]
    pub fn with_frame_name(mut self, frame_name: impl Into<String>) -> Self {
        self.frame_name = frame_name.into();
        self
    }

    /// Sets the disposition.
    #[must_use]
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Sets the window options.
    #[must_use]
    pub fn with_options(mut self, options: WindowOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the unrecognized features.
    #[must_use]
    pub fn with_additional_features(mut self, features: Vec<String>) -> Self {
        self.additional_features = features;
        self
    }

    /// Sets the POST body.
    #[must_use]
    pub fn with_post_data(mut self, post_data: Vec<PostDataChunk>) -> Self {
        self.post_data = Some(post_data);
        self
    }
}

// ============================================================================
// OpenOutcome
// ============================================================================

/// Result of [`Broker::open`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOutcome {
    /// The guest now serving the request; `None` when suppressed.
    pub guest: Option<ContentsId>,

    /// `true` when the caller should discard any contents it pre-created
    /// for this request.
    pub default_prevented: bool,
}

impl OpenOutcome {
    #[inline]
    fn guest(id: ContentsId, default_prevented: bool) -> Self {
        Self {
            guest: Some(id),
            default_prevented,
        }
    }

    #[inline]
    fn suppressed(default_prevented: bool) -> Self {
        Self {
            guest: None,
            default_prevented,
        }
    }
}

// ============================================================================
// Broker - Open
// ============================================================================

impl Broker {
    /// Handles a raw `window.open` from `sender`.
    ///
    /// An empty or missing `url` loads the configured blank page.
    ///
    /// # Errors
    ///
    /// - [`Error::ContentsNotFound`] if `sender` is gone
    /// - [`Error::OpenDenied`] if `sender` runs with native `window.open` or
    ///   a sandbox, and must not use this path
    /// - [`Error::Host`] if window creation fails
    pub fn open_raw(
        &self,
        sender: ContentsId,
        url: Option<&str>,
        frame_name: Option<&str>,
        features: Option<&str>,
    ) -> Result<Option<ContentsId>> {
        let embedder = self.lookup(sender)?;
        if embedder.preferences.native_window_open() || embedder.preferences.sandbox() {
            warn!(sender = %sender, url = %embedder.url, "Blocked raw window.open");
            return Err(Error::open_denied(sender));
        }

        let url = match url {
            Some(url) if !url.is_empty() => url,
            _ => self.inner.options.blank_url.as_str(),
        };
        let frame_name = frame_name.unwrap_or_default();

        let parsed = self.host().parse_features(features.unwrap_or_default());
        let mut options = parsed.options;
        if options.title().is_none() {
            options.set(TITLE_KEY, frame_name);
        }
        options.set_web_preferences(parsed.web_preferences);

        let request = OpenRequest::new(url)
            .with_referrer(self.inner.options.default_referrer())
            .with_frame_name(frame_name)
            .with_disposition(Disposition::NewWindow)
            .with_options(options)
            .with_additional_features(parsed.additional_features);

        Ok(self.open_for(&embedder, request)?.guest)
    }

    /// Handles a fully parsed open request from `sender`.
    ///
    /// # Errors
    ///
    /// - [`Error::ContentsNotFound`] if `sender` is gone
    /// - [`Error::Host`] if window creation fails
    pub fn open(&self, sender: ContentsId, request: OpenRequest) -> Result<OpenOutcome> {
        let embedder = self.lookup(sender)?;
        self.open_for(&embedder, request)
    }
}

// ============================================================================
// Broker - Open Internals
// ============================================================================

impl Broker {
    fn open_for(&self, embedder: &ContentsInfo, request: OpenRequest) -> Result<OpenOutcome> {
        let OpenRequest {
            url,
            referrer,
            frame_name,
            disposition,
            mut options,
            additional_features,
            post_data,
        } = request;

        if let Some(guest) = self.reusable_guest(&frame_name) {
            debug!(guest = %guest, frame_name = %frame_name, url = %url, "Reusing named guest");
            if let Err(e) = self.host().load_url(guest, &url, &LoadOptions::default()) {
                warn!(guest = %guest, url = %url, error = %e, "Error navigating named guest");
            }
            return Ok(OpenOutcome::guest(guest, false));
        }

        let owner = self
            .host()
            .owner_window(embedder.id)
            .and_then(|window| self.host().window_state(window));
        inherit_options(embedder, owner, &mut options);

        let event = NewWindowEvent {
            sender: embedder.id,
            url,
            frame_name,
            disposition,
            options,
            additional_features,
            referrer,
            post_body: post_data.map(PostBody::new),
        };
        let decision = self.decide(&event);
        let NewWindowEvent {
            url,
            frame_name,
            options,
            referrer,
            post_body,
            ..
        } = event;

        let popups_disabled = embedder.kind.is_webview() && embedder.preferences.disable_popups();
        let outcome = match decision {
            NewWindowDecision::Proceed if !popups_disabled => {
                let guest =
                    self.create_guest(embedder.id, &url, referrer, &frame_name, &options, post_body)?;
                OpenOutcome::guest(guest, false)
            }
            NewWindowDecision::Substitute(guest) => {
                // the substitute adopted the pre-created contents, so keep it
                let default_prevented = options.web_contents() != Some(guest.contents);
                let id = self.setup_guest(embedder.id, &frame_name, guest);
                OpenOutcome::guest(id, default_prevented)
            }
            NewWindowDecision::Proceed => OpenOutcome::suppressed(false),
            NewWindowDecision::Cancel => OpenOutcome::suppressed(true),
        };

        if outcome.guest.is_none() {
            debug!(sender = %embedder.id, url = %url, popups_disabled, "Window open suppressed");
        }
        Ok(outcome)
    }

    /// Returns the live guest holding `frame_name`, dropping a stale entry.
    fn reusable_guest(&self, frame_name: &str) -> Option<ContentsId> {
        if frame_name.is_empty() {
            return None;
        }
        let guest = self.inner.frames.get(frame_name)?;
        if self.host().contents(guest).is_some() {
            return Some(guest);
        }
        self.inner.frames.remove_if(frame_name, guest);
        None
    }

    fn decide(&self, event: &NewWindowEvent) -> NewWindowDecision {
        self.inner
            .hook
            .as_ref()
            .map_or(NewWindowDecision::Proceed, |hook| hook.on_new_window(event))
    }

    fn create_guest(
        &self,
        embedder: ContentsId,
        url: &str,
        referrer: Referrer,
        frame_name: &str,
        options: &WindowOptions,
        post_body: Option<PostBody>,
    ) -> Result<ContentsId> {
        let guest = self.host().create_window(options)?;
        let id = self.setup_guest(embedder, frame_name, guest);

        // an adopted contents navigates on its own
        if options.web_contents().is_none() {
            let load = LoadOptions {
                http_referrer: referrer,
                extra_headers: post_body.as_ref().map(|body| body.format.header_line()),
                post_data: post_body.map(|body| body.data),
            };
            if let Err(e) = self.host().load_url(id, url, &load) {
                warn!(guest = %id, url = %url, error = %e, "Error loading new guest");
            }
        }

        Ok(id)
    }
}

// ============================================================================
// Tests
// ============================================================================
