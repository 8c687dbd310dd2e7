//! Task status transition table.
//!
//! ```text
//! locked ──cascade|reviewer──▶ unlocked ──quota|reviewer──▶ completed
//!                              rework   ──quota|reviewer──▶ completed
//! completed ──reviewer──▶ rework | blocked | ready_for_next
//! ```
//!
//! Reaching `ready_for_next` unlocks the next task if it is still locked.

use crate::core::error::DomainError;
use crate::discussion::status::TaskStatus;
use crate::discussion::task::TaskId;
use serde::{Deserialize, Serialize};

/// What caused a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// The task reached its required number of annotators
    Quota,
    /// The previous task became ready for the next one
    Cascade,
    /// A reviewer set the status explicitly
    Reviewer,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Quota => "quota",
            Trigger::Cascade => "cascade",
            Trigger::Reviewer => "reviewer",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event applied to one task's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    QuotaReached,
    CascadeUnlock,
    /// Explicit target chosen by a reviewer
    SetByReviewer(TaskStatus),
}

impl TaskEvent {
    pub fn trigger(&self) -> Trigger {
        match self {
            TaskEvent::QuotaReached => Trigger::Quota,
            TaskEvent::CascadeUnlock => Trigger::Cascade,
            TaskEvent::SetByReviewer(_) => Trigger::Reviewer,
        }
    }
}

/// A status change that happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub task: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub trigger: Trigger,
}

/// Follow-up work caused by entering a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    UnlockNext(TaskId),
}

struct Edge {
    from: TaskStatus,
    to: TaskStatus,
    triggers: &'static [Trigger],
}

const EDGES: &[Edge] = &[
    Edge {
        from: TaskStatus::Locked,
        to: TaskStatus::Unlocked,
        triggers: &[Trigger::Cascade, Trigger::Reviewer],
    },
    Edge {
        from: TaskStatus::Unlocked,
        to: TaskStatus::Completed,
        triggers: &[Trigger::Quota, Trigger::Reviewer],
    },
    Edge {
        from: TaskStatus::Rework,
        to: TaskStatus::Completed,
        triggers: &[Trigger::Quota, Trigger::Reviewer],
    },
    Edge {
        from: TaskStatus::Completed,
        to: TaskStatus::Rework,
        triggers: &[Trigger::Reviewer],
    },
    Edge {
        from: TaskStatus::Completed,
        to: TaskStatus::Blocked,
        triggers: &[Trigger::Reviewer],
    },
    Edge {
        from: TaskStatus::Completed,
        to: TaskStatus::ReadyForNext,
        triggers: &[Trigger::Reviewer],
    },
];

/// Whether `trigger` may move a task from `from` to `to`
pub fn is_allowed(from: TaskStatus, to: TaskStatus, trigger: Trigger) -> bool {
    EDGES
        .iter()
        .any(|e| e.from == from && e.to == to && e.triggers.contains(&trigger))
}

/// Statuses reachable from `from` with `trigger`
pub fn allowed_targets(from: TaskStatus, trigger: Trigger) -> Vec<TaskStatus> {
    EDGES
        .iter()
        .filter(|e| e.from == from && e.triggers.contains(&trigger))
        .map(|e| e.to)
        .collect()
}

/// Decide the effect of `event` on a task currently in `from`.
///
/// Returns `Ok(None)` when an automatic event (quota, cascade) does not
/// apply in the current status. Reviewer targets outside the table are
/// rejected with [`DomainError::InvalidTransition`].
pub fn next_state(
    task: TaskId,
    from: TaskStatus,
    event: TaskEvent,
) -> Result<Option<(TaskStatus, Vec<SideEffect>)>, DomainError> {
    let trigger = event.trigger();
    let to = match event {
        TaskEvent::QuotaReached => TaskStatus::Completed,
        TaskEvent::CascadeUnlock => TaskStatus::Unlocked,
        TaskEvent::SetByReviewer(target) => target,
    };

    if !is_allowed(from, to, trigger) {
        return match event {
            TaskEvent::SetByReviewer(_) => Err(DomainError::InvalidTransition {
                task: task.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            }),
            _ => Ok(None),
        };
    }

    let mut effects = Vec::new();
    if to == TaskStatus::ReadyForNext {
        if let Some(next) = task.next() {
            effects.push(SideEffect::UnlockNext(next));
        }
    }
    Ok(Some((to, effects)))
}
