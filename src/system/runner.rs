use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, PoisonError},
    thread,
};

/// Names a kind of background work for mutual exclusion. Two requests with
/// the same key never run concurrently; requests with different keys may.
/// Keys identify the operation, not its arguments, so two exports of
/// different documents still serialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey(String);

impl From<&str> for TaskKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for TaskKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
enum TaskState {
    Queued,
    Running,
    Completed,
}

/// Fire-and-forget execution of blocking library calls on worker threads.
///
/// There is no result or error channel: a task that wants to report back
/// sends through a channel it captures (see `DataHandler`). A task that
/// panics is logged and otherwise invisible to the caller. Tasks cannot be
/// cancelled and waiters are not subject to any timeout; a task that never
/// returns blocks every later request for the same key.
#[derive(Debug, Clone, Default)]
pub struct TaskRunner {
    locks: Arc<Mutex<HashMap<TaskKey, Arc<Mutex<()>>>>>,
}

impl TaskRunner {
    /// Schedules `task` on its own thread and returns immediately. If
    /// another task with the same key is still running, the new thread
    /// waits for it to finish before starting.
    pub fn run_async<F>(&self, key: impl Into<TaskKey>, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let key = key.into();
        let lock = self.lock_for(&key);
        tracing::debug!("Task \"{key}\" {}", TaskState::Queued);

        thread::spawn(move || {
            let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            tracing::debug!("Task \"{key}\" {}", TaskState::Running);

            let result = panic::catch_unwind(AssertUnwindSafe(task));

            drop(guard);
            match result {
                Ok(()) => tracing::debug!("Task \"{key}\" {}", TaskState::Completed),
                Err(_) => tracing::error!("Task \"{key}\" panicked"),
            }
        });
    }

    /// Advisory probe: whether a task under `key` currently holds the key.
    /// The answer can be stale by the time the caller acts on it.
    pub fn is_running(&self, key: impl Into<TaskKey>) -> bool {
        self.lock_for(&key.into()).try_lock().is_err()
    }

    fn lock_for(&self, key: &TaskKey) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_default()
            .clone()
    }
}
