//! Message-bridge dispatch.
//!
//! Every endpoint that targets a window runs the same gate, in order:
//!
//! 1. resolve the opaque id argument to a live contents,
//! 2. check the sender's relationship to it,
//! 3. parse the method against the endpoint's allow-list,
//! 4. invoke it through the host.
//!
//! | Channel | Check | Allow-list |
//! |---------|-------|------------|
//! | `WINDOW_OPEN` | sender eligibility | n/a |
//! | `WINDOW_METHOD` | `can_access` | [`WindowMethod`] |
//! | `WINDOW_POSTMESSAGE` | `is_related_window` | n/a |
//! | `WEB_CONTENTS_METHOD_ASYNC` | `can_access` | [`ContentsMethod`] |
//! | `WEB_CONTENTS_METHOD_SYNC` | `can_access` | [`SyncContentsMethod`] |

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::host::ContentsInfo;
use crate::identifiers::{ContentsId, WindowId};
use crate::protocol::{
    Channel, ContentsMethod, InternalMessage, Request, Response, SyncContentsMethod, WindowMethod,
};

use super::core::Broker;

// ============================================================================
// Constants
// ============================================================================

/// Target origin that matches any receiver.
const ANY_ORIGIN: &str = "*";

// ============================================================================
// Broker - Bridge Entry Points
// ============================================================================

impl Broker {
    /// Handles a bridge request from `sender` on any channel.
    pub async fn handle(&self, sender: ContentsId, request: Request) -> Response {
        let Request { id, channel, args } = request;
        debug!(request_id = %id, channel = channel.name(), sender = %sender, "Bridge request");

        let result = match channel {
            Channel::ContentsMethodAsync => self.contents_method_async(sender, &args).await,
            _ => self.dispatch_sync(sender, channel, &args),
        };
        Response::from_result(id, result)
    }

    /// Handles a bridge request whose caller blocks for the reply.
    ///
    /// Only [`Channel::is_sync`] channels are served; anything else is
    /// answered with [`Error::MalformedRequest`].
    pub fn handle_sync(&self, sender: ContentsId, request: Request) -> Response {
        let Request { id, channel, args } = request;
        debug!(request_id = %id, channel = channel.name(), sender = %sender, "Sync bridge request");

        let result = if channel.is_sync() {
            self.dispatch_sync(sender, channel, &args)
        } else {
            Err(Error::malformed(format!("{} is not a sync channel", channel.name())))
        };
        Response::from_result(id, result)
    }

    fn dispatch_sync(&self, sender: ContentsId, channel: Channel, args: &[Value]) -> Result<Value> {
        match channel {
            Channel::WindowOpen => self.window_open(sender, args),
            Channel::WindowMethod => self.window_method(sender, args),
            Channel::WindowPostMessage => self.post_message(sender, args).map(|()| Value::Null),
            Channel::ContentsMethodSync => self.contents_method_sync(sender, args),
            Channel::ContentsMethodAsync => Err(Error::malformed(format!(
                "{} is not a sync channel",
                channel.name()
            ))),
        }
    }
}

// ============================================================================
// Broker - Endpoints
// ============================================================================

impl Broker {
    /// `WINDOW_OPEN`: `url?, frameName?, features?`.
    fn window_open(&self, sender: ContentsId, args: &[Value]) -> Result<Value> {
        let url = optional_str(args, 0, "url")?;
        let frame_name = optional_str(args, 1, "frameName")?;
        let features = optional_str(args, 2, "features")?;

        let guest = self.open_raw(sender, url, frame_name, features)?;
        Ok(guest.map_or(Value::Null, Value::from))
    }

    /// `WINDOW_METHOD`: `windowId, method, args...`.
    fn window_method(&self, sender: ContentsId, args: &[Value]) -> Result<Value> {
        let (sender, target) = self.resolve(sender, args)?;
        self.security_check(&sender, &target, self.relations().can_access(&sender, &target))?;

        let name = method_name(args)?;
        let method = self.allow(&sender, name, WindowMethod::parse(name, rest(args)))?;

        let window = self.guest_window(&target)?;
        debug!(guest_id = %target.id, window = %window, method = method.name(), "Window method");
        self.host().call_window_method(window, &method)
    }

    /// `WINDOW_POSTMESSAGE`: `windowId, message, targetOrigin?, sourceOrigin?`.
    fn post_message(&self, sender: ContentsId, args: &[Value]) -> Result<()> {
        let (sender, target) = self.resolve(sender, args)?;
        self.security_check(&sender, &target, self.relations().is_related_window(&sender, &target))?;

        let message = args.get(1).cloned().unwrap_or(Value::Null);
        let target_origin = optional_str(args, 2, "targetOrigin")?.unwrap_or(ANY_ORIGIN);
        let source_origin = optional_str(args, 3, "sourceOrigin")?.map(str::to_string);

        if target_origin != ANY_ORIGIN && !self.host().is_same_origin(&target.url, target_origin) {
            debug!(
                sender = %sender.id,
                guest_id = %target.id,
                target_origin,
                "postMessage origin mismatch, dropped"
            );
            return Ok(());
        }

        let delivery = InternalMessage::PostMessage {
            source_id: sender.id,
            message,
            source_origin,
        };
        if let Err(e) = self.host().send_internal(target.id, delivery) {
            debug!(guest_id = %target.id, error = %e, "Error delivering postMessage");
        }
        Ok(())
    }

    /// `WEB_CONTENTS_METHOD_ASYNC`: `windowId, method, args...`.
    async fn contents_method_async(&self, sender: ContentsId, args: &[Value]) -> Result<Value> {
        let (sender, target) = self.resolve(sender, args)?;
        self.security_check(&sender, &target, self.relations().can_access(&sender, &target))?;

        let name = method_name(args)?;
        let method = self.allow(&sender, name, ContentsMethod::parse(name, rest(args)))?;

        debug!(guest_id = %target.id, method = method.name(), "Contents method");
        self.host().call_contents_method(target.id, method).await
    }

    /// `WEB_CONTENTS_METHOD_SYNC`: `windowId, method, args...`.
    fn contents_method_sync(&self, sender: ContentsId, args: &[Value]) -> Result<Value> {
        let (sender, target) = self.resolve(sender, args)?;
        self.security_check(&sender, &target, self.relations().can_access(&sender, &target))?;

        let name = method_name(args)?;
        let method = self.allow(&sender, name, SyncContentsMethod::parse(name, rest(args)))?;

        match method {
            SyncContentsMethod::GetUrl => Ok(Value::String(target.url)),
        }
    }
}

// ============================================================================
// Broker - Gate
// ============================================================================

impl Broker {
    /// Resolves the sender and the id in `args[0]` to live contents.
    fn resolve(&self, sender: ContentsId, args: &[Value]) -> Result<(ContentsInfo, ContentsInfo)> {
        let raw = args.first().unwrap_or(&Value::Null);
        let target = ContentsId::from_value(raw).ok_or_else(|| Error::invalid_id(raw))?;
        let target = self.lookup(target)?;
        let sender = self.lookup(sender)?;
        Ok((sender, target))
    }

    /// Refuses the call unless the relationship check passed.
    fn security_check(&self, sender: &ContentsInfo, target: &ContentsInfo, allowed: bool) -> Result<()> {
        if allowed {
            return Ok(());
        }
        warn!(
            sender = %sender.id,
            url = %sender.url,
            guest_id = %target.id,
            "Blocked access to guest"
        );
        Err(Error::access_denied(target.id))
    }

    /// Logs an allow-list refusal and passes the parse result through.
    fn allow<T>(&self, sender: &ContentsInfo, name: &str, parsed: Result<T>) -> Result<T> {
        if let Err(Error::MethodBlocked { .. }) = &parsed {
            warn!(sender = %sender.id, url = %sender.url, method = name, "Blocked method call");
        }
        parsed
    }

    /// Finds the top-level window showing `target`, directly or through
    /// its host contents.
    fn guest_window(&self, target: &ContentsInfo) -> Result<WindowId> {
        self.host()
            .owner_window(target.id)
            .or_else(|| {
                target
                    .host_contents
                    .and_then(|host_contents| self.host().owner_window(host_contents))
            })
            .ok_or_else(|| Error::window_not_found(target.id))
    }
}

// ============================================================================
// Argument Helpers
// ============================================================================

fn method_name(args: &[Value]) -> Result<&str> {
    args.get(1)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed("method name must be a string"))
}

fn rest(args: &[Value]) -> &[Value] {
    args.get(2..).unwrap_or_default()
}

fn optional_str<'a>(args: &'a [Value], index: usize, what: &str) -> Result<Option<&'a str>> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(Error::malformed(format!("{what} must be a string"))),
    }
}

// ============================================================================
// Tests
// ============================================================================
