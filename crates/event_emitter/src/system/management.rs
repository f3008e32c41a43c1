/// Removal and introspection methods
use crate::types::{CapturerHandle, EventId, ListenerHandle};
use super::core::Emitter;
use std::mem;
use tracing::debug;

// Removed records are dropped after the guard is released: dropping the last
// reference drops the handler closure, and its captures may call back in.

impl Emitter {
    /// Removes one listener of `event` by its handle.
    ///
    /// The remaining listeners keep their order. Returns `false`, and changes
    /// nothing, when the handle is unknown, already removed, or registered
    /// under a different event.
    ///
    /// An emission whose snapshot was taken before this call may still invoke
    /// the listener once; no emission that starts after this call returns will.
    pub fn remove_listener(&self, event: impl Into<EventId>, handle: ListenerHandle) -> bool {
        let event = event.into();

        let removed = {
            let mut registry = self.registry();
            let Some(slot) = registry.listeners.get_mut(&event) else {
                return false;
            };
            let Some(index) = slot.iter().position(|listener| listener.id == handle.id()) else {
                return false;
            };
            let removed = slot.remove(index);
            if slot.is_empty() {
                registry.listeners.remove(&event);
            }
            removed
        };

        debug!("🗑️ Removed listener {} from '{}'", handle.id(), event);
        drop(removed);
        true
    }

    /// Removes every listener of `event`.
    pub fn remove_all_listeners_for_event(&self, event: impl Into<EventId>) {
        let event = event.into();
        let removed = self.registry().listeners.remove(&event);

        if let Some(slot) = removed {
            debug!("🗑️ Removed {} listeners from '{}'", slot.len(), event);
        }
    }

    /// Removes every listener of every event. Capturers are untouched.
    pub fn remove_all_listeners(&self) {
        let removed = mem::take(&mut self.registry().listeners);
        debug!("🗑️ Removed listeners for {} events", removed.len());
    }

    /// Removes one capturer by its handle.
    ///
    /// Returns `false`, and changes nothing, when the handle is unknown or
    /// already removed.
    pub fn remove_capturer(&self, handle: CapturerHandle) -> bool {
        let removed = {
            let mut registry = self.registry();
            let Some(index) = registry.capturers.iter().position(|capturer| capturer.id == handle.id()) else {
                return false;
            };
            registry.capturers.remove(index)
        };

        debug!("🗑️ Removed capturer {}", handle.id());
        drop(removed);
        true
    }

    /// Removes every capturer. Listeners are untouched.
    pub fn remove_all_capturers(&self) {
        let removed = mem::take(&mut self.registry().capturers);
        debug!("🗑️ Removed {} capturers", removed.len());
    }

    /// Number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry()
            .listeners
            .get(event)
            .map_or(0, |slot| slot.len())
    }

    /// Whether at least one listener is registered for `event`.
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    /// Number of capturers currently registered.
    pub fn capturer_count(&self) -> usize {
        self.registry().capturers.len()
    }

    /// Event ids that currently have at least one listener, sorted.
    pub fn registered_events(&self) -> Vec<EventId> {
        let mut events: Vec<EventId> = self.registry().listeners.keys().cloned().collect();
        events.sort();
        events
    }
}
