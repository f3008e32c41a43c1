//! # Handler Records
//!
//! Listeners and capturers as the registry stores them. A record pairs the
//! caller's closure with the identity minted at registration and the `once`
//! flag. Records are reference counted so that an emission can keep invoking
//! its snapshot after the live registry has moved on.

use crate::types::{EventId, HandlerId};
use serde_json::Value;
use std::fmt::Debug;

/// Signature of a listener: receives the emission's arguments.
pub type ListenerFn = dyn Fn(&[Value]) + Send + Sync + 'static;

/// Signature of a capturer: receives the emitted event id and its arguments.
pub type CaptureFn = dyn Fn(&EventId, &[Value]) + Send + Sync + 'static;

/// A handler bound to a single event id.
pub(crate) struct Listener {
    pub(crate) id: HandlerId,
    pub(crate) once: bool,
    handler: Box<ListenerFn>,
}

impl Listener {
    pub(crate) fn new(handler: Box<ListenerFn>, once: bool) -> Self {
        Self {
            id: HandlerId::new(),
            once,
            handler,
        }
    }

    #[inline]
    pub(crate) fn invoke(&self, args: &[Value]) {
        (self.handler)(args)
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("once", &self.once)
            .finish()
    }
}

/// A handler that receives every emitted event.
pub(crate) struct Capturer {
    pub(crate) id: HandlerId,
    pub(crate) once: bool,
    handler: Box<CaptureFn>,
}

impl Capturer {
    pub(crate) fn new(handler: Box<CaptureFn>, once: bool) -> Self {
        Self {
            id: HandlerId::new(),
            once,
            handler,
        }
    }

    #[inline]
    pub(crate) fn invoke(&self, event: &EventId, args: &[Value]) {
        (self.handler)(event, args)
    }
}

impl Debug for Capturer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capturer")
            .field("id", &self.id)
            .field("once", &self.once)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_listener_invoke_forwards_arguments() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let listener = Listener::new(
            Box::new(move |args: &[Value]| {
                seen_clone.fetch_add(args.len(), Ordering::SeqCst);
            }),
            false,
        );

        listener.invoke(&[json!("test"), json!(123), json!(true)]);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert!(!listener.once);
    }

    #[test]
    fn test_capturer_receives_event_id() {
        let last = Arc::new(std::sync::Mutex::new(None));
        let last_clone = last.clone();
        let capturer = Capturer::new(
            Box::new(move |event: &EventId, _args: &[Value]| {
                *last_clone.lock().unwrap() = Some(event.clone());
            }),
            true,
        );

        capturer.invoke(&EventId::from("Wow"), &[json!(2)]);
        assert_eq!(last.lock().unwrap().as_ref().unwrap(), "Wow");
        assert!(capturer.once);
    }

    #[test]
    fn test_records_get_fresh_ids() {
        let a = Listener::new(Box::new(|_: &[Value]| {}), false);
        let b = Listener::new(Box::new(|_: &[Value]| {}), false);
        assert_ne!(a.id, b.id);
        assert!(format!("{:?}", a).contains("once: false"));
    }
}
