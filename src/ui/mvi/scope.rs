//! Independently cancellable task groups.
//!
//! A view model owns two groups: the lifetime group, open from construction
//! until the screen is cleared, and the started group, entered on every
//! `on_start` and drained on every `on_stop`. Draining aborts every task in
//! the group at its next suspension point and refuses new work until the
//! group is entered again.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a spawned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Handle to a task spawned in a [`TaskGroup`].
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    abort: AbortHandle,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Request cancellation. The task stops at its next suspension point.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

#[derive(Clone)]
pub struct TaskGroup {
    inner: Arc<GroupInner>,
}

struct GroupInner {
    name: &'static str,
    tasks: Mutex<Tasks>,
}

struct Tasks {
    accepting: bool,
    running: HashMap<TaskId, AbortHandle>,
}

impl TaskGroup {
    /// A group that accepts work immediately.
    pub fn new(name: &'static str) -> Self {
        Self::with_state(name, true)
    }

    /// A group that refuses work until [`TaskGroup::enter`] is called.
    pub fn inactive(name: &'static str) -> Self {
        Self::with_state(name, false)
    }

    fn with_state(name: &'static str, accepting: bool) -> Self {
        Self {
            inner: Arc::new(GroupInner {
                name,
                tasks: Mutex::new(Tasks {
                    accepting,
                    running: HashMap::new(),
                }),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn is_accepting(&self) -> bool {
        self.inner.tasks.lock().accepting
    }

    /// Start accepting work.
    pub fn enter(&self) {
        self.inner.tasks.lock().accepting = true;
    }

    /// Abort every running task and refuse new work until the next
    /// [`TaskGroup::enter`]. Returns the number of tasks aborted.
    pub fn drain(&self) -> usize {
        let running = {
            let mut tasks = self.inner.tasks.lock();
            tasks.accepting = false;
            std::mem::take(&mut tasks.running)
        };

        let mut aborted = 0;
        for handle in running.into_values() {
            if !handle.is_finished() {
                handle.abort();
                aborted += 1;
            }
        }
        if aborted > 0 {
            tracing::debug!(group = self.inner.name, aborted, "Drained task group");
        }
        aborted
    }

    /// Number of tasks that have not finished yet.
    pub fn len(&self) -> usize {
        let mut tasks = self.inner.tasks.lock();
        tasks.running.retain(|_, handle| !handle.is_finished());
        tasks.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn `future` in this group. Returns `None` when the group is not
    /// accepting work; the future is dropped unpolled.
    pub fn spawn<F>(&self, future: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn_with_id(|_| future)
    }

    /// Like [`TaskGroup::spawn`], but the future is built from the identity
    /// of the task that will run it.
    pub fn spawn_with_id<F, Fut>(&self, make: F) -> Option<TaskHandle>
    where
        F: FnOnce(TaskId) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // Spawning under the lock keeps drain() from missing a task that
        // passed the accepting check.
        let mut tasks = self.inner.tasks.lock();
        if !tasks.accepting {
            tracing::debug!(group = self.inner.name, "Task group not accepting work");
            return None;
        }

        tasks.running.retain(|_, handle| !handle.is_finished());

        let id = TaskId::next();
        let abort = tokio::spawn(make(id)).abort_handle();
        tasks.running.insert(id, abort.clone());
        Some(TaskHandle { id, abort })
    }
}

impl fmt::Debug for TaskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tasks = self.inner.tasks.lock();
        f.debug_struct("TaskGroup")
            .field("name", &self.inner.name)
            .field("accepting", &tasks.accepting)
            .field("tasks", &tasks.running.len())
            .finish()
    }
}
