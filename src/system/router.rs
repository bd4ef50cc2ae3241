use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::error::Error;

/// A subscribed receiver. Callbacks take no payload; receivers pull whatever
/// state they need through the registry or shared context.
pub type SignalCallback = Rc<dyn Fn()>;

/// Broker between signal emitters and their listeners.
///
/// Subscriptions are keyed by (sender id, signal name) and dispatched in
/// insertion order, synchronously, on the calling thread. There is no way to
/// remove a subscription; screens that are rebuilt repeatedly will
/// accumulate entries. Like the registry, the router is single-threaded by
/// construction.
#[derive(Default)]
pub struct Router {
    declared: RefCell<HashMap<String, HashSet<String>>>,
    receivers: RefCell<HashMap<(String, String), Vec<SignalCallback>>>,
}

impl Router {
    /// Records that `signal` is a legal signal for the component with the
    /// given id. Advisory bookkeeping: emission does not require it, and
    /// redeclaring is a no-op.
    pub fn declare_sender(&self, id: &str, signal: &str) -> Result<(), Error> {
        if signal.is_empty() {
            return Err(Error::EmptySignalName);
        }
        let mut declared = self.declared.borrow_mut();
        let signals = declared.entry(id.to_string()).or_default();
        if signals.insert(signal.to_string()) {
            tracing::debug!("Created signal \"{id}::{signal}\"");
        }
        Ok(())
    }

    /// Appends `callback` to the dispatch list for `(sender_id, signal)`.
    /// Subscribing the same callback twice is allowed; it fires twice.
    pub fn subscribe(&self, sender_id: &str, signal: &str, callback: SignalCallback) {
        tracing::debug!("Adding receiver for \"{sender_id}::{signal}\"");
        self.receivers
            .borrow_mut()
            .entry((sender_id.to_string(), signal.to_string()))
            .or_default()
            .push(callback);
    }

    /// Like [`Self::subscribe`], but splices the callback into the dispatch
    /// order at `position`. Positions past the end append.
    pub fn subscribe_at(
        &self,
        sender_id: &str,
        signal: &str,
        position: usize,
        callback: SignalCallback,
    ) {
        tracing::debug!("Adding receiver for \"{sender_id}::{signal}\" at position {position}");
        let mut receivers = self.receivers.borrow_mut();
        let callbacks = receivers
            .entry((sender_id.to_string(), signal.to_string()))
            .or_default();
        let position = position.min(callbacks.len());
        callbacks.insert(position, callback);
    }

    /// Fires `signal` on behalf of `sender_id`, invoking every subscribed
    /// callback in dispatch order before returning. A pair nobody listens to
    /// is a no-op. A panicking callback unwinds into the emitter; callbacks
    /// are not isolated from each other.
    pub fn emit(&self, sender_id: &str, signal: &str) {
        if !self.is_declared(sender_id, signal) {
            tracing::debug!("\"{sender_id}\" emitted undeclared signal \"{signal}\"");
        }

        // Snapshot before dispatch: callbacks may re-enter the router to
        // subscribe or emit, which must not hit a live borrow of the table.
        // A subscription added mid-emission first fires on the next one.
        let callbacks = self
            .receivers
            .borrow()
            .get(&(sender_id.to_string(), signal.to_string()))
            .cloned()
            .unwrap_or_default();

        tracing::debug!("Emitting signal \"{signal}\" from \"{sender_id}\"");
        for callback in callbacks {
            callback();
        }
    }

    pub fn is_declared(&self, id: &str, signal: &str) -> bool {
        self.declared
            .borrow()
            .get(id)
            .is_some_and(|signals| signals.contains(signal))
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("declared", &self.declared)
            .field("receivers", &self.receivers.borrow().keys())
            .finish()
    }
}
