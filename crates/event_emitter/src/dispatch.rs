//! # Detached Dispatch
//!
//! When an emitter runs in asynchronous mode, every handler invocation is
//! packaged as a [`Job`] and handed to a [`Dispatcher`]. The emitter only
//! needs "run this eventually, somewhere else": no join handle, no
//! cancellation, no result.
//!
//! Two facilities are provided:
//!
//! - [`ThreadDispatcher`] - one named OS thread per job
//! - [`TokioDispatcher`] - the blocking pool of a tokio runtime

use crate::error::EmitterError;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use tokio::runtime::Handle;
use tracing::warn;

/// A single handler invocation, ready to run on any thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Default name given to threads spawned by [`ThreadDispatcher`].
pub const DEFAULT_THREAD_NAME: &str = "emitter-dispatch";

/// Scheduling facility used by asynchronous emitters.
///
/// `dispatch` must return without waiting for the job. A job that panics is
/// the job's own problem; implementations are not expected to recover it.
pub trait Dispatcher: Send + Sync + Debug {
    /// Submits a job to run independently of the caller.
    fn dispatch(&self, job: Job);

    /// Short name for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Runs every job on a freshly spawned, named OS thread.
///
/// When the thread cannot be spawned (thread or memory limits) the job runs
/// inline on the dispatching thread instead, so no invocation is lost.
#[derive(Debug, Clone)]
pub struct ThreadDispatcher {
    thread_name: String,
    stack_size: Option<usize>,
}

impl ThreadDispatcher {
    /// Creates a dispatcher whose threads are named [`DEFAULT_THREAD_NAME`].
    pub fn new() -> Self {
        Self::with_thread_name(DEFAULT_THREAD_NAME)
    }

    /// Creates a dispatcher whose threads carry the given name.
    pub fn with_thread_name(name: impl Into<String>) -> Self {
        Self {
            thread_name: name.into(),
            stack_size: None,
        }
    }

    /// Sets the stack size of spawned threads, in bytes.
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    /// Name given to spawned threads.
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
}

fn take_job(slot: &Mutex<Option<Job>>) -> Option<Job> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

impl Default for ThreadDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&self, job: Job) {
        // A failed spawn drops its closure, so the job waits in a slot that
        // both the thread and the fallback path can take it from.
        let slot = Arc::new(Mutex::new(Some(job)));
        let pending = slot.clone();

        let mut builder = thread::Builder::new().name(self.thread_name.clone());
        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let spawned = builder.spawn(move || {
            if let Some(job) = take_job(&pending) {
                job();
            }
        });

        if let Err(e) = spawned {
            warn!(
                "⚠️ Failed to spawn dispatch thread '{}' ({}), running job inline",
                self.thread_name, e
            );
            if let Some(job) = take_job(&slot) {
                job();
            }
        }
    }

    fn name(&self) -> &str {
        "thread"
    }
}

/// Runs every job on a tokio runtime's blocking pool.
///
/// Handlers are synchronous closures, so they go through `spawn_blocking`
/// rather than occupying an async worker.
#[derive(Debug, Clone)]
pub struct TokioDispatcher {
    handle: Handle,
}

impl TokioDispatcher {
    /// Creates a dispatcher bound to the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a dispatcher bound to the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns [`EmitterError::RuntimeUnavailable`] when called outside of a
    /// tokio runtime.
    pub fn current() -> Result<Self, EmitterError> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl Dispatcher for TokioDispatcher {
    fn dispatch(&self, job: Job) {
        // Fire-and-forget: the JoinHandle is dropped, the task keeps running.
        drop(self.handle.spawn_blocking(job));
    }

    fn name(&self) -> &str {
        "tokio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_thread_dispatcher_runs_on_named_thread() {
        let dispatcher = ThreadDispatcher::with_thread_name("dispatch-test");
        let (tx, rx) = mpsc::channel();

        dispatcher.dispatch(Box::new(move || {
            let name = thread::current().name().map(str::to_string);
            tx.send(name).unwrap();
        }));

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("dispatch-test"));
        assert_eq!(dispatcher.name(), "thread");
    }

    // No address space can back a 1 EiB stack, so the spawn always fails.
    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_thread_dispatcher_runs_job_inline_when_spawn_fails() {
        let dispatcher = ThreadDispatcher::with_thread_name("never-spawned").with_stack_size(1 << 60);
        let (tx, rx) = mpsc::channel();

        dispatcher.dispatch(Box::new(move || {
            tx.send(thread::current().id()).unwrap();
        }));

        // Inline fallback: already ran, on this thread.
        let ran_on = rx.try_recv().expect("job should have run inline");
        assert_eq!(ran_on, thread::current().id());
    }

    #[test]
    fn test_thread_dispatcher_default_name() {
        assert_eq!(ThreadDispatcher::default().thread_name(), DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_tokio_dispatcher_requires_runtime() {
        let result = TokioDispatcher::current();
        assert!(matches!(result, Err(EmitterError::RuntimeUnavailable(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tokio_dispatcher_runs_job() {
        let dispatcher = TokioDispatcher::current().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        dispatcher.dispatch(Box::new(move || {
            tx.send(42u32).unwrap();
        }));

        let value = tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("job should run")
            .unwrap();
        assert_eq!(value, 42);
    }
}
