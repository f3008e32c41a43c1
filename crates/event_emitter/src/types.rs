//! # Core Type Definitions
//!
//! The identifiers and payload types shared by every part of the emitter.
//!
//! ## Key Types
//!
//! - [`EventId`] - Names an event category; exact value equality
//! - [`Arguments`] - The opaque, variadic argument list delivered to handlers
//! - [`HandlerId`] - Identity minted for every registration
//! - [`ListenerHandle`] / [`CapturerHandle`] - Tokens returned to callers for targeted removal

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::ops::Deref;
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Event Identifiers
// ============================================================================

/// Identifier of an event category.
///
/// Event ids are plain strings compared by exact value. Short ids stay inline
/// in the `CompactString` and never touch the heap.
///
/// # Examples
///
/// ```rust
/// use event_emitter::EventId;
///
/// let id = EventId::from("player_joined");
/// assert_eq!(id, "player_joined");
/// assert_eq!(id.to_string(), "player_joined");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(CompactString);

impl EventId {
    /// Creates an event id from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(CompactString::new(id.as_ref()))
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for EventId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(CompactString::from(id))
    }
}

impl From<&String> for EventId {
    fn from(id: &String) -> Self {
        Self::new(id)
    }
}

impl From<&EventId> for EventId {
    fn from(id: &EventId) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for EventId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// The argument list carried by one emission.
///
/// A shared, immutable slice of JSON values. The emitter never looks inside
/// it; cloning only bumps a reference count, so detached dispatch hands the
/// same allocation to every job.
///
/// Build one with the [`args!`](crate::args) macro, from a `Vec<Value>`, from
/// an array of values, or from `()` for an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments(Arc<[Value]>);

impl Arguments {
    /// An empty argument list.
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// Returns the arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Arguments {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self(Arc::from(values))
    }
}

impl From<&[Value]> for Arguments {
    fn from(values: &[Value]) -> Self {
        Self(Arc::from(values))
    }
}

impl<const N: usize> From<[Value; N]> for Arguments {
    fn from(values: [Value; N]) -> Self {
        Self(Arc::from(Vec::from(values)))
    }
}

impl From<Value> for Arguments {
    fn from(value: Value) -> Self {
        Self(Arc::from(vec![value]))
    }
}

impl From<()> for Arguments {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

// ============================================================================
// Registration Identity
// ============================================================================

/// Unique identity of a single registration.
///
/// Minted once per `add_*` / `*_once` call. Two registrations of the same
/// closure still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerId(pub Uuid);

impl HandlerId {
    /// Creates a new random handler ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HandlerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token returned by [`Emitter::add_listener`](crate::Emitter::add_listener)
/// and [`Emitter::listen_once`](crate::Emitter::listen_once).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    id: HandlerId,
}

impl ListenerHandle {
    pub(crate) fn new(id: HandlerId) -> Self {
        Self { id }
    }

    /// The registration this handle refers to.
    pub fn id(&self) -> HandlerId {
        self.id
    }
}

/// Token returned by [`Emitter::add_capturer`](crate::Emitter::add_capturer)
/// and [`Emitter::capture_once`](crate::Emitter::capture_once).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapturerHandle {
    id: HandlerId,
}

impl CapturerHandle {
    pub(crate) fn new(id: HandlerId) -> Self {
        Self { id }
    }

    /// The registration this handle refers to.
    pub fn id(&self) -> HandlerId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_event_id_lookup_by_str() {
        let mut map: HashMap<EventId, u32> = HashMap::new();
        map.insert(EventId::from("test event A"), 1);

        assert_eq!(map.get("test event A"), Some(&1));
        assert_eq!(map.get("test event B"), None);
    }

    #[test]
    fn test_event_id_equality_is_exact() {
        assert_eq!(EventId::from("A"), EventId::from(String::from("A")));
        assert_ne!(EventId::from("A"), EventId::from("a"));
        assert_ne!(EventId::from("A"), EventId::from("A "));
    }

    #[test]
    fn test_event_id_serializes_as_plain_string() {
        let id = EventId::from("rootevent");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("rootevent"));

        let parsed: EventId = serde_json::from_value(json!("subevent")).unwrap();
        assert_eq!(parsed, "subevent");
    }

    #[test]
    fn test_arguments_conversions() {
        assert!(Arguments::from(()).is_empty());
        assert!(Arguments::default().is_empty());

        let from_array = Arguments::from([json!("test"), json!(123), json!(true)]);
        let from_vec = Arguments::from(vec![json!("test"), json!(123), json!(true)]);
        assert_eq!(from_array, from_vec);
        assert_eq!(from_array.len(), 3);

        let single = Arguments::from(json!(1));
        assert_eq!(single.as_slice(), &[json!(1)]);
    }

    #[test]
    fn test_arguments_clone_shares_storage() {
        let args = Arguments::from(vec![json!({"big": "payload"})]);
        let cloned = args.clone();
        assert!(std::ptr::eq(args.as_slice().as_ptr(), cloned.as_slice().as_ptr()));
    }

    #[test]
    fn test_handles_are_distinct_per_registration() {
        let a = ListenerHandle::new(HandlerId::new());
        let b = ListenerHandle::new(HandlerId::new());
        assert_ne!(a, b);
        assert_eq!(a, ListenerHandle::new(a.id()));
    }
}
