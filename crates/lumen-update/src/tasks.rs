//! Tasks that must run on the update context.
//!
//! Anything that touches state owned by the update loop (the GUI-facing
//! half of the world) is wrapped in a closure and handed to an
//! [`UpdateTaskManager`]. The loop calls [`UpdateTaskManager::run_pending`]
//! once per frame.
//!
//! # Two queues
//!
//! ```text
//!   add_task ─────────────► current ──┐
//!                                     ├──► run_pending drains until empty
//!   add_task_for_later ───► later ────┘    (later is appended to current
//!                                           when the drain starts)
//! ```
//!
//! A task added to `current` while a drain runs is picked up by that same
//! drain. A task added to `later` never is: it waits for the next call.
//! This keeps "run this after the current frame's work settles" separate
//! from "run this as soon as possible".

use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

/// A unit of work for the update context.
pub type Task<C> = Box<dyn FnOnce(&mut TaskContext<'_, C>) + Send>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings for an [`UpdateTaskManager`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Catch a panicking task, log it, and keep draining.
    ///
    /// When `false` the panic propagates out of `run_pending`.
    pub isolate_panics: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            isolate_panics: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Drain report
// ---------------------------------------------------------------------------

/// Summary of one [`UpdateTaskManager::run_pending`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Tasks popped and run, including the ones that panicked.
    pub executed: usize,
    /// Tasks that panicked.
    pub panicked: usize,
    /// Tasks waiting in the next-pass queue when the drain finished.
    pub deferred: usize,
}

// ---------------------------------------------------------------------------
// Task context
// ---------------------------------------------------------------------------

/// What a running task sees: the state, the frame delta, and the manager.
pub struct TaskContext<'a, C> {
    state: &'a mut C,
    manager: &'a UpdateTaskManager<C>,
    delta: Duration,
}

impl<C: 'static> TaskContext<'_, C> {
    pub fn state(&mut self) -> &mut C {
        &mut *self.state
    }

    /// Time since the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Runs `task` right now, before this call returns.
    ///
    /// We're already on the update context, so there's nothing to queue.
    pub fn add_task<F>(&mut self, task: F)
    where
        F: FnOnce(&mut TaskContext<'_, C>) + Send + 'static,
    {
        task(self);
    }

    /// Queues `task` for the next drain.
    pub fn add_task_for_later<F>(&self, task: F)
    where
        F: FnOnce(&mut TaskContext<'_, C>) + Send + 'static,
    {
        self.manager.add_task_for_later(task);
    }

    /// A handle to the manager, for passing to other threads.
    pub fn manager(&self) -> UpdateTaskManager<C> {
        self.manager.clone()
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DrainState {
    update_thread: Option<ThreadId>,
    delta: Duration,
}

struct Shared<C> {
    current: Mutex<VecDeque<Task<C>>>,
    later: Mutex<VecDeque<Task<C>>>,
    drain: Mutex<DrainState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A task panicking outside the queue locks can't leave a queue half
    // written, so the data behind a poisoned lock is still sound.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Queue of work for the update context.
///
/// Cloning yields another handle to the same queues; handles can be sent
/// to any thread.
pub struct UpdateTaskManager<C> {
    shared: Arc<Shared<C>>,
    config: UpdateConfig,
}

impl<C> Clone for UpdateTaskManager<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            config: self.config.clone(),
        }
    }
}

impl<C> fmt::Debug for UpdateTaskManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateTaskManager")
            .field("current", &lock(&self.shared.current).len())
            .field("later", &lock(&self.shared.later).len())
            .field("config", &self.config)
            .finish()
    }
}

impl<C: 'static> Default for UpdateTaskManager<C> {
    fn default() -> Self {
        Self::new(UpdateConfig::default())
    }
}

/// Clears the update-thread marker even if a task unwinds through
/// `run_pending`.
struct DrainGuard<'a> {
    drain: &'a Mutex<DrainState>,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        lock(self.drain).update_thread = None;
    }
}

impl<C: 'static> UpdateTaskManager<C> {
    pub fn new(config: UpdateConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                current: Mutex::new(VecDeque::new()),
                later: Mutex::new(VecDeque::new()),
                drain: Mutex::new(DrainState::default()),
            }),
            config,
        }
    }

    /// Queues `task` for the current drain, or the next one if none is
    /// running. Safe to call from any thread.
    ///
    /// This never runs the task inline, not even from the thread running
    /// a drain ([`is_update_thread`](Self::is_update_thread)): a cloned
    /// handle used inside a task still queues, and the task runs later in
    /// the same drain. Only [`TaskContext::add_task`] runs a task inline.
    pub fn add_task<F>(&self, task: F)
    where
        F: FnOnce(&mut TaskContext<'_, C>) + Send + 'static,
    {
        lock(&self.shared.current).push_back(Box::new(task));
    }

    /// Queues `task` for the next drain. A drain already in progress will
    /// not run it.
    pub fn add_task_for_later<F>(&self, task: F)
    where
        F: FnOnce(&mut TaskContext<'_, C>) + Send + 'static,
    {
        lock(&self.shared.later).push_back(Box::new(task));
    }

    /// Runs every queued task against `state`.
    ///
    /// Deferred tasks join the back of the current queue, so everything
    /// queued before this call runs in the order it was queued. Tasks added
    /// with `add_task` while this drain runs are picked up too; tasks added
    /// for later wait for the next call.
    pub fn run_pending(&self, state: &mut C, delta: Duration) -> DrainReport {
        {
            let mut drain = lock(&self.shared.drain);
            drain.update_thread = Some(thread::current().id());
            drain.delta = delta;
        }
        let _guard = DrainGuard {
            drain: &self.shared.drain,
        };

        self.promote_later();

        let mut report = DrainReport::default();
        loop {
            // Pop under the lock, run without it, so tasks can enqueue.
            let Some(task) = lock(&self.shared.current).pop_front() else {
                break;
            };
            let mut cx = TaskContext {
                state: &mut *state,
                manager: self,
                delta,
            };
            report.executed += 1;
            trace!(index = report.executed, "running update task");

            if self.config.isolate_panics {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| task(&mut cx))) {
                    report.panicked += 1;
                    error!(
                        panic = panic_message(payload.as_ref()),
                        "update task panicked; continuing with the next one"
                    );
                }
            } else {
                task(&mut cx);
            }
        }

        report.deferred = lock(&self.shared.later).len();
        if report.executed > 0 {
            debug!(
                executed = report.executed,
                panicked = report.panicked,
                deferred = report.deferred,
                "update tasks drained"
            );
        }
        report
    }

    fn promote_later(&self) {
        let mut current = lock(&self.shared.current);
        let mut later = lock(&self.shared.later);
        current.append(&mut later);
    }

    /// `true` if the calling thread is running a drain right now.
    pub fn is_update_thread(&self) -> bool {
        lock(&self.shared.drain).update_thread == Some(thread::current().id())
    }

    /// Delta passed to the latest drain.
    pub fn delta(&self) -> Duration {
        lock(&self.shared.drain).delta
    }

    /// Tasks waiting in either queue.
    pub fn pending(&self) -> usize {
        lock(&self.shared.current).len() + lock(&self.shared.later).len()
    }

    /// Discards every queued task and returns how many there were.
    pub fn clear(&self) -> usize {
        let dropped = {
            let mut current = lock(&self.shared.current);
            let n = current.len();
            current.clear();
            n
        } + {
            let mut later = lock(&self.shared.later);
            let n = later.len();
            later.clear();
            n
        };
        if dropped > 0 {
            debug!(dropped, "update tasks discarded");
        }
        dropped
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
