/// Core Emitter implementation
use crate::config::{EmitterConfig, ExecutorKind};
use crate::dispatch::{Dispatcher, ThreadDispatcher, TokioDispatcher};
use crate::error::EmitterError;
use crate::events::{Capturer, Listener};
use crate::types::EventId;
use super::stats::{EmitterStats, StatsCounters};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Ordered listeners of one event. Most events have a handful of listeners,
/// so they live inline.
pub(super) type ListenerSlot = SmallVec<[Arc<Listener>; 4]>;

/// Live registrations. Only ever touched through [`Emitter::registry`].
#[derive(Debug, Default)]
pub(super) struct Registry {
    /// Event id to listeners, in registration order. Never holds an empty slot.
    pub(super) listeners: HashMap<EventId, ListenerSlot>,
    /// Catch-all handlers, in registration order.
    pub(super) capturers: Vec<Arc<Capturer>>,
}

impl Registry {
    pub(super) fn total_listeners(&self) -> usize {
        self.listeners.values().map(|slot| slot.len()).sum()
    }
}

/// How invocations leave `emit_event`.
#[derive(Debug)]
pub(super) enum Dispatch {
    /// Called on the emitting thread before `emit_event` returns
    Inline,
    /// Handed to a scheduling facility, one job per invocation
    Detached(Arc<dyn Dispatcher>),
}

/// In-process publish/subscribe registry.
///
/// Listeners are bound to one [`EventId`]; capturers receive every event.
/// All bookkeeping happens under a single mutex that is never held while a
/// handler runs, so handlers may freely register, remove or emit on the same
/// emitter.
///
/// Share an emitter between threads (and with its own handlers) through an
/// `Arc`. A handler that needs the emitter should capture a `Weak` to avoid a
/// reference cycle through the registry.
///
/// # Examples
///
/// ```rust
/// use event_emitter::{args, Emitter};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let emitter = Emitter::new(false);
/// let fired = Arc::new(AtomicUsize::new(0));
///
/// let counter = fired.clone();
/// let handle = emitter.add_listener("saved", move |args| {
///     assert_eq!(args[0], "report.pdf");
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// emitter.emit_event("saved", args!["report.pdf"]);
/// emitter.remove_listener("saved", handle);
/// emitter.emit_event("saved", args!["ignored.pdf"]);
///
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
pub struct Emitter {
    registry: Mutex<Registry>,
    pub(super) dispatch: Dispatch,
    pub(super) counters: StatsCounters,
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("registry", &"[registry]")
            .field("dispatcher", &self.dispatcher_name())
            .finish()
    }
}

impl Emitter {
    /// Creates an emitter with no registrations.
    ///
    /// With `async_dispatch = false` handlers run inline on the thread that
    /// calls [`emit_event`](Self::emit_event). With `true` every invocation
    /// runs on its own [`ThreadDispatcher`] thread and `emit_event` returns
    /// immediately. The choice holds for the emitter's lifetime.
    pub fn new(async_dispatch: bool) -> Self {
        if async_dispatch {
            Self::with_dispatcher(Arc::new(ThreadDispatcher::new()))
        } else {
            Self::from_dispatch(Dispatch::Inline)
        }
    }

    /// Creates an asynchronous emitter on a caller-supplied facility.
    pub fn with_dispatcher(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self::from_dispatch(Dispatch::Detached(dispatcher))
    }

    /// Creates an emitter from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not validate, or when it asks for the
    /// tokio executor and the caller is not inside a tokio runtime.
    pub fn from_config(config: &EmitterConfig) -> Result<Self, EmitterError> {
        config.validate()?;

        if !config.async_dispatch {
            return Ok(Self::new(false));
        }

        let dispatcher: Arc<dyn Dispatcher> = match config.executor {
            ExecutorKind::Thread => {
                Arc::new(ThreadDispatcher::with_thread_name(config.thread_name.clone()))
            }
            ExecutorKind::Tokio => Arc::new(TokioDispatcher::current()?),
        };

        Ok(Self::with_dispatcher(dispatcher))
    }

    fn from_dispatch(dispatch: Dispatch) -> Self {
        let emitter = Self {
            registry: Mutex::new(Registry::default()),
            dispatch,
            counters: StatsCounters::default(),
        };
        debug!("🔧 Emitter created (dispatch: {})", emitter.dispatcher_name());
        emitter
    }

    /// Whether handler invocations are detached from `emit_event`.
    #[inline]
    pub fn is_async(&self) -> bool {
        matches!(self.dispatch, Dispatch::Detached(_))
    }

    /// Name of the dispatch facility, `"inline"` for synchronous emitters.
    pub fn dispatcher_name(&self) -> &str {
        match &self.dispatch {
            Dispatch::Inline => "inline",
            Dispatch::Detached(dispatcher) => dispatcher.name(),
        }
    }

    /// Gets current emitter statistics.
    pub fn stats(&self) -> EmitterStats {
        let (total_listeners, total_capturers) = {
            let registry = self.registry();
            (registry.total_listeners(), registry.capturers.len())
        };
        self.counters.snapshot(total_listeners, total_capturers)
    }

    /// Acquires the registry guard.
    ///
    /// The guard only ever covers bookkeeping, so a poisoned lock still
    /// protects a consistent registry and is recovered.
    pub(super) fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(false)
    }
}
