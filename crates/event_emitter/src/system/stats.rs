/// Statistics tracking for the emitter
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time emitter statistics for monitoring.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterStats {
    /// Number of `emit_event` calls since the emitter was created
    pub events_emitted: u64,
    /// Listener invocations selected by emissions. Counted before any handler
    /// runs, so a synchronous panic does not take back the skipped ones.
    pub listener_invocations: u64,
    /// Capturer invocations selected by emissions, counted like listeners
    pub capturer_invocations: u64,
    /// Once-registrations removed after firing
    pub once_expired: u64,
    /// Listeners currently registered, across all events
    pub total_listeners: usize,
    /// Capturers currently registered
    pub total_capturers: usize,
}

/// Lock-free counters bumped on every emission.
#[derive(Debug, Default)]
pub(super) struct StatsCounters {
    events_emitted: AtomicU64,
    listener_invocations: AtomicU64,
    capturer_invocations: AtomicU64,
    once_expired: AtomicU64,
}

impl StatsCounters {
    #[inline]
    pub(super) fn record_emission(&self, listeners: usize, capturers: usize, expired: usize) {
        self.events_emitted.fetch_add(1, Ordering::Relaxed);
        self.listener_invocations.fetch_add(listeners as u64, Ordering::Relaxed);
        self.capturer_invocations.fetch_add(capturers as u64, Ordering::Relaxed);
        if expired > 0 {
            self.once_expired.fetch_add(expired as u64, Ordering::Relaxed);
        }
    }

    pub(super) fn snapshot(&self, total_listeners: usize, total_capturers: usize) -> EmitterStats {
        EmitterStats {
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            listener_invocations: self.listener_invocations.load(Ordering::Relaxed),
            capturer_invocations: self.capturer_invocations.load(Ordering::Relaxed),
            once_expired: self.once_expired.load(Ordering::Relaxed),
            total_listeners,
            total_capturers,
        }
    }
}
