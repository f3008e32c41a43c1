//! # Utility Functions
//!
//! Factory helpers for the common ways of holding an emitter.

use crate::config::EmitterConfig;
use crate::error::EmitterError;
use crate::system::Emitter;
use std::sync::Arc;

/// Creates a new emitter behind an `Arc`.
///
/// Emitters are meant to be shared between threads and captured (as `Weak`)
/// by their own handlers, so this is the usual way to build one.
pub fn create_emitter(async_dispatch: bool) -> Arc<Emitter> {
    Arc::new(Emitter::new(async_dispatch))
}

/// Creates a new emitter from configuration, behind an `Arc`.
pub fn create_emitter_from_config(config: &EmitterConfig) -> Result<Arc<Emitter>, EmitterError> {
    Emitter::from_config(config).map(Arc::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExecutorKind;

    #[test]
    fn test_create_emitter() {
        let emitter = create_emitter(true);
        assert!(emitter.is_async());
        assert_eq!(emitter.dispatcher_name(), "thread");
        assert_eq!(Arc::strong_count(&emitter), 1);
    }

    #[test]
    fn test_create_emitter_from_config() {
        let emitter = create_emitter_from_config(&EmitterConfig::default()).unwrap();
        assert!(!emitter.is_async());

        let result = create_emitter_from_config(&EmitterConfig::asynchronous(ExecutorKind::Tokio));
        assert!(result.is_err());
    }
}
