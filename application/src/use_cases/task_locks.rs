//! Per-task critical sections.
//!
//! Every state change of a `(discussion, task)` pair runs while holding that
//! pair's guard. Guards for several tasks are always taken in ascending task
//! order.

use annotation_domain::{DiscussionId, TaskId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

type Slot = Arc<AsyncMutex<()>>;

/// Registry of per-(discussion, task) async mutexes
#[derive(Default)]
pub struct TaskLocks {
    slots: Mutex<HashMap<(DiscussionId, TaskId), Slot>>,
}

/// Held guards; the critical section ends when this is dropped
#[must_use]
pub struct TaskGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl TaskLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, discussion_id: &DiscussionId, task: TaskId) -> Slot {
        // The map only holds Arcs, so a poisoned lock is still consistent
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots
            .entry((discussion_id.clone(), task))
            .or_default()
            .clone()
    }

    /// Lock one task
    pub async fn acquire(&self, discussion_id: &DiscussionId, task: TaskId) -> TaskGuard {
        self.acquire_many(discussion_id, &[task]).await
    }

    /// Lock a task and the task after it, if any
    pub async fn acquire_with_next(&self, discussion_id: &DiscussionId, task: TaskId) -> TaskGuard {
        match task.next() {
            Some(next) => self.acquire_many(discussion_id, &[task, next]).await,
            None => self.acquire(discussion_id, task).await,
        }
    }

    async fn acquire_many(&self, discussion_id: &DiscussionId, tasks: &[TaskId]) -> TaskGuard {
        let mut ordered = tasks.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for task in ordered {
            let slot = self.slot(discussion_id, task);
            guards.push(slot.lock_owned().await);
            trace!("Locked {}/{}", discussion_id, task);
        }
        TaskGuard { _guards: guards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_task_is_exclusive() {
        let locks = Arc::new(TaskLocks::new());
        let id = DiscussionId::new("d1");

        let guard = locks.acquire(&id, TaskId::Task1).await;

        let waiting = {
            let locks = Arc::clone(&locks);
            let id = id.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&id, TaskId::Task1).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .expect("second acquire should finish")
            .unwrap();
    }

    #[tokio::test]
    async fn test_other_tasks_are_independent() {
        let locks = TaskLocks::new();
        let id = DiscussionId::new("d1");

        let _first = locks.acquire(&id, TaskId::Task1).await;
        let second = tokio::time::timeout(Duration::from_secs(1), locks.acquire(&id, TaskId::Task2)).await;
        assert!(second.is_ok());

        let other = DiscussionId::new("d2");
        let third = tokio::time::timeout(Duration::from_secs(1), locks.acquire(&other, TaskId::Task1)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_acquire_with_next_blocks_next_task() {
        let locks = Arc::new(TaskLocks::new());
        let id = DiscussionId::new("d1");

        let guard = locks.acquire_with_next(&id, TaskId::Task1).await;
        let blocked = tokio::time::timeout(
            Duration::from_millis(20),
            locks.acquire(&id, TaskId::Task2),
        )
        .await;
        assert!(blocked.is_err());

        drop(guard);
        let _task3 = locks.acquire_with_next(&id, TaskId::Task3).await;
    }
}
