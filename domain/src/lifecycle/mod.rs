//! Task lifecycle
//!
//! Status transitions, the task-to-task cascade, and submission admission.

pub mod admission;
pub mod transition;

pub use admission::{Admission, AdmissionError, admit};
pub use transition::{SideEffect, TaskEvent, Transition, Trigger, allowed_targets, is_allowed, next_state};

use crate::core::error::DomainError;
use crate::discussion::entities::Discussion;
use crate::discussion::task::TaskId;

/// Apply `event` to one task of `discussion`, following side effects.
///
/// Returns every transition made, in order. On error nothing is changed.
pub fn apply_event(
    discussion: &mut Discussion,
    task: TaskId,
    event: TaskEvent,
) -> Result<Vec<Transition>, DomainError> {
    let from = discussion.task(task).status;
    let Some((to, effects)) = next_state(task, from, event)? else {
        return Ok(Vec::new());
    };

    discussion.task_mut(task).status = to;
    let mut transitions = vec![Transition {
        task,
        from,
        to,
        trigger: event.trigger(),
    }];

    for effect in effects {
        match effect {
            SideEffect::UnlockNext(next) => {
                transitions.extend(apply_event(discussion, next, TaskEvent::CascadeUnlock)?);
            }
        }
    }
    Ok(transitions)
}

/// Tasks whose state changed, without duplicates
pub fn touched_tasks(transitions: &[Transition]) -> Vec<TaskId> {
    let mut tasks: Vec<TaskId> = transitions.iter().map(|t| t.task).collect();
    tasks.sort();
    tasks.dedup();
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::status::TaskStatus;

    fn discussion() -> Discussion {
        Discussion::new("d1", "Tokio runtime panics", "https://github.com/o/r/discussions/1", "o/r")
    }

    #[test]
    fn test_quota_completes_task() {
        let mut d = discussion();
        let transitions = apply_event(&mut d, TaskId::Task1, TaskEvent::QuotaReached).unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(d.task(TaskId::Task1).status, TaskStatus::Completed);
    }

    #[test]
    fn test_ready_for_next_cascades() {
        let mut d = discussion();
        d.task_mut(TaskId::Task1).status = TaskStatus::Completed;

        let transitions = apply_event(
            &mut d,
            TaskId::Task1,
            TaskEvent::SetByReviewer(TaskStatus::ReadyForNext),
        )
        .unwrap();

        assert_eq!(transitions.len(), 2);
        assert_eq!(d.task(TaskId::Task2).status, TaskStatus::Unlocked);
        assert_eq!(transitions[1].trigger, Trigger::Cascade);
        assert_eq!(touched_tasks(&transitions), vec![TaskId::Task1, TaskId::Task2]);
    }

    #[test]
    fn test_cascade_leaves_started_task_alone() {
        let mut d = discussion();
        d.task_mut(TaskId::Task1).status = TaskStatus::Completed;
        d.task_mut(TaskId::Task2).status = TaskStatus::Rework;

        let transitions = apply_event(
            &mut d,
            TaskId::Task1,
            TaskEvent::SetByReviewer(TaskStatus::ReadyForNext),
        )
        .unwrap();

        assert_eq!(transitions.len(), 1);
        assert_eq!(d.task(TaskId::Task2).status, TaskStatus::Rework);
    }

    #[test]
    fn test_invalid_reviewer_transition_changes_nothing() {
        let mut d = discussion();
        let before = d.clone();
        assert!(apply_event(
            &mut d,
            TaskId::Task1,
            TaskEvent::SetByReviewer(TaskStatus::Blocked)
        )
        .is_err());
        assert_eq!(d, before);
    }
}
