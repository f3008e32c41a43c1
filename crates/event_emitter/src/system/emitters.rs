/// Event emission methods
use crate::events::{Capturer, Listener};
use crate::types::{Arguments, EventId};
use super::core::{Dispatch, Emitter};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::trace;

/// Handlers selected for one emission, fixed at the time `emit_event` is called.
struct Snapshot {
    listeners: SmallVec<[Arc<Listener>; 4]>,
    capturers: SmallVec<[Arc<Capturer>; 4]>,
    expired: usize,
}

impl Snapshot {
    fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.capturers.is_empty()
    }
}

impl Emitter {
    /// Emits `event` with `args` to its listeners and to every capturer.
    ///
    /// The set of handlers is fixed when this is called: listeners of `event`
    /// in registration order, then capturers in registration order. Once
    /// registrations in that set are removed before any of them runs.
    ///
    /// Synchronous emitters run the handlers on the calling thread and return
    /// when the last one returns; a panicking handler unwinds out of this call
    /// and skips the handlers after it. Asynchronous emitters submit one job
    /// per handler and return immediately.
    ///
    /// Handlers may call back into this emitter, including `emit_event`.
    /// Emitting an event nobody listens to does nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use event_emitter::{args, Emitter};
    ///
    /// let emitter = Emitter::new(false);
    /// emitter.add_capturer(|event, args| {
    ///     println!("{} -> {:?}", event, args);
    /// });
    /// emitter.emit_event("test event A", args!["test", 123, true]);
    /// emitter.emit_event("nothing", ());
    /// ```
    pub fn emit_event(&self, event: impl Into<EventId>, args: impl Into<Arguments>) {
        let event = event.into();
        let snapshot = self.take_snapshot(&event);

        if snapshot.is_empty() {
            trace!("No handlers for event: {}", event);
            return;
        }

        trace!(
            "📤 Emitting '{}' to {} listeners and {} capturers",
            event,
            snapshot.listeners.len(),
            snapshot.capturers.len()
        );

        let args = args.into();
        match &self.dispatch {
            Dispatch::Inline => {
                for listener in &snapshot.listeners {
                    listener.invoke(&args);
                }
                for capturer in &snapshot.capturers {
                    capturer.invoke(&event, &args);
                }
            }
            Dispatch::Detached(dispatcher) => {
                for listener in snapshot.listeners {
                    let args = args.clone();
                    dispatcher.dispatch(Box::new(move || listener.invoke(&args)));
                }
                for capturer in snapshot.capturers {
                    let args = args.clone();
                    let event = event.clone();
                    dispatcher.dispatch(Box::new(move || capturer.invoke(&event, &args)));
                }
            }
        }
    }

    /// Phase one of an emission, entirely under the guard: copy out the
    /// handlers to run, strip once-registrations from the live registry and
    /// count the emission.
    fn take_snapshot(&self, event: &EventId) -> Snapshot {
        let mut guard = self.registry();
        let registry = &mut *guard;

        let mut listeners: SmallVec<[Arc<Listener>; 4]> = SmallVec::new();
        let mut expired = 0;

        let mut slot_emptied = false;
        if let Some(slot) = registry.listeners.get_mut(event) {
            listeners.extend(slot.iter().cloned());
            if slot.iter().any(|listener| listener.once) {
                let before = slot.len();
                slot.retain(|listener| !listener.once);
                expired += before - slot.len();
                slot_emptied = slot.is_empty();
            }
        }
        if slot_emptied {
            registry.listeners.remove(event);
        }

        let capturers: SmallVec<[Arc<Capturer>; 4]> = registry.capturers.iter().cloned().collect();
        if capturers.iter().any(|capturer| capturer.once) {
            let before = registry.capturers.len();
            registry.capturers.retain(|capturer| !capturer.once);
            expired += before - registry.capturers.len();
        }

        if expired > 0 {
            trace!("⏳ {} once-registrations expired while emitting '{}'", expired, event);
        }

        self.counters.record_emission(listeners.len(), capturers.len(), expired);

        Snapshot {
            listeners,
            capturers,
            expired,
        }
    }
}
