/// Listener and capturer registration methods
use crate::events::{CaptureFn, Capturer, Listener, ListenerFn};
use crate::types::{CapturerHandle, EventId, ListenerHandle};
use super::core::Emitter;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

impl Emitter {
    /// Registers a listener that fires on every emission of `event`.
    ///
    /// Listeners of one event fire in registration order. The returned handle
    /// is the only way to remove this registration individually.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use event_emitter::{args, Emitter};
    ///
    /// let emitter = Emitter::new(false);
    /// emitter.add_listener("chat", |args| {
    ///     println!("chat message: {}", args[0]);
    /// });
    /// emitter.emit_event("chat", args!["hello"]);
    /// ```
    pub fn add_listener<F>(&self, event: impl Into<EventId>, handler: F) -> ListenerHandle
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.register_listener(event.into(), Box::new(handler), false)
    }

    /// Registers a listener that fires on the next emission of `event` only.
    ///
    /// The registration is removed from the live registry as part of the
    /// emission that fires it, so neither a later handler in the same emission
    /// nor a nested or concurrent emission can fire it again.
    pub fn listen_once<F>(&self, event: impl Into<EventId>, handler: F) -> ListenerHandle
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.register_listener(event.into(), Box::new(handler), true)
    }

    /// Registers a capturer that receives every emitted event.
    ///
    /// Capturers fire after the event's listeners, in registration order,
    /// and receive the event id ahead of the arguments.
    pub fn add_capturer<F>(&self, handler: F) -> CapturerHandle
    where
        F: Fn(&EventId, &[Value]) + Send + Sync + 'static,
    {
        self.register_capturer(Box::new(handler), false)
    }

    /// Registers a capturer that receives the next emitted event only.
    pub fn capture_once<F>(&self, handler: F) -> CapturerHandle
    where
        F: Fn(&EventId, &[Value]) + Send + Sync + 'static,
    {
        self.register_capturer(Box::new(handler), true)
    }

    fn register_listener(&self, event: EventId, handler: Box<ListenerFn>, once: bool) -> ListenerHandle {
        let listener = Arc::new(Listener::new(handler, once));
        let handle = ListenerHandle::new(listener.id);

        let count = {
            let mut registry = self.registry();
            let slot = registry.listeners.entry(event.clone()).or_default();
            slot.push(listener);
            slot.len()
        };

        debug!(
            "📝 Registered {}listener {} for '{}' ({} total)",
            if once { "once-" } else { "" },
            handle.id(),
            event,
            count
        );
        handle
    }

    fn register_capturer(&self, handler: Box<CaptureFn>, once: bool) -> CapturerHandle {
        let capturer = Arc::new(Capturer::new(handler, once));
        let handle = CapturerHandle::new(capturer.id);

        let count = {
            let mut registry = self.registry();
            registry.capturers.push(capturer);
            registry.capturers.len()
        };

        debug!(
            "📝 Registered {}capturer {} ({} total)",
            if once { "once-" } else { "" },
            handle.id(),
            count
        );
        handle
    }
}
