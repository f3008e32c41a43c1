//! # Event Emitter
//!
//! An in-process publish/subscribe registry. Code registers handlers against
//! string event ids and emits events carrying an ordered list of JSON values.
//!
//! ## Core Features
//!
//! - **Listeners**: bound to one event id, invoked in registration order
//! - **Capturers**: catch-all handlers that see every event and its id
//! - **Once registrations**: removed atomically by the emission that fires them
//! - **Handle-based removal**: every registration returns an opaque handle
//! - **Re-entrancy**: handlers may register, remove or emit on the same emitter
//! - **Detached dispatch**: asynchronous emitters hand each invocation to a
//!   [`Dispatcher`] (OS threads or the tokio blocking pool)
//!
//! ## Quick Start
//!
//! ```rust
//! use event_emitter::*;
//!
//! let emitter = create_emitter(false);
//!
//! let greeter = emitter.add_listener("player_joined", |args| {
//!     println!("welcome, {}", args[0]);
//! });
//! emitter.listen_once("player_joined", |_| println!("first player!"));
//! emitter.add_capturer(|event, args| println!("[audit] {} {:?}", event, args));
//!
//! emitter.emit_event("player_joined", args!["ada", 1]);
//! emitter.emit_event("player_joined", args!["grace", 2]);
//!
//! emitter.remove_listener("player_joined", greeter);
//! assert_eq!(emitter.listener_count("player_joined"), 0);
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod system;
pub mod types;
pub mod utils;

pub use config::{EmitterConfig, ExecutorKind};
pub use dispatch::{Dispatcher, Job, ThreadDispatcher, TokioDispatcher, DEFAULT_THREAD_NAME};
pub use error::EmitterError;
pub use events::{CaptureFn, ListenerFn};
pub use system::{Emitter, EmitterStats};
pub use types::{Arguments, CapturerHandle, EventId, HandlerId, ListenerHandle};
pub use utils::{create_emitter, create_emitter_from_config};

// Handlers receive `serde_json::Value`s; re-exported so callers and `args!`
// agree on the version.
pub use serde_json;

/// Builds [`Arguments`] from a list of JSON-convertible expressions.
///
/// Each element is an expression converted with `serde_json::json!`, so
/// literals, variables and anything `Serialize` work. Use `json!` inline for
/// `null`, arrays or objects.
///
/// ```rust
/// use event_emitter::{args, Arguments};
///
/// let args: Arguments = args!["test", 123, true];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[1], 123);
///
/// let empty: Arguments = args![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Arguments::empty()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Arguments::from(vec![$($crate::serde_json::json!($arg)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_args_macro() {
        let name = "ada";
        let args = args![name, 1.5, vec![1, 2], json!({ "k": null }),];
        assert_eq!(
            args.as_slice(),
            &[json!("ada"), json!(1.5), json!([1, 2]), json!({ "k": null })]
        );
        assert!(args![].is_empty());
    }
}
