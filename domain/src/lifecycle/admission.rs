//! Who may submit an annotation for a task.

use crate::core::role::Role;
use crate::discussion::entities::TaskState;
use thiserror::Error;

/// Why a submission was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A new annotator takes an open slot
    NewAnnotator,
    /// The user replaces their own earlier submission
    Resubmission,
    /// A reviewer submits beyond the quota
    ReviewerOverride,
}

impl Admission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Admission::NewAnnotator => "new_annotator",
            Admission::Resubmission => "resubmission",
            Admission::ReviewerOverride => "reviewer_override",
        }
    }

    /// Whether accepting the submission adds an annotator
    pub fn adds_annotator(&self) -> bool {
        !matches!(self, Admission::Resubmission)
    }
}

/// Why a submission was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("Task is locked")]
    TaskLocked,

    #[error("Annotator quota reached ({count}/{required})")]
    QuotaExceeded { count: usize, required: usize },
}

/// Decide whether a user may submit.
///
/// `count` is the number of distinct annotators already recorded and
/// `has_prior` whether this user is one of them. Reviewers bypass the
/// quota but not the lock.
pub fn admit(
    state: &TaskState,
    count: usize,
    has_prior: bool,
    role: Role,
) -> Result<Admission, AdmissionError> {
    if has_prior {
        return Ok(Admission::Resubmission);
    }
    if state.status.is_locked() {
        return Err(AdmissionError::TaskLocked);
    }
    if count >= state.required_annotators {
        if role.is_reviewer() {
            return Ok(Admission::ReviewerOverride);
        }
        return Err(AdmissionError::QuotaExceeded {
            count,
            required: state.required_annotators,
        });
    }
    Ok(Admission::NewAnnotator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::status::TaskStatus;
    use crate::discussion::task::TaskId;

    fn state(status: TaskStatus) -> TaskState {
        TaskState::new(TaskId::Task1, status)
    }

    #[test]
    fn test_locked_task_rejects_newcomers() {
        assert_eq!(
            admit(&state(TaskStatus::Locked), 0, false, Role::Annotator),
            Err(AdmissionError::TaskLocked)
        );
        // Reviewers get no exemption from the lock
        assert_eq!(
            admit(&state(TaskStatus::Locked), 0, false, Role::Admin),
            Err(AdmissionError::TaskLocked)
        );
    }

    #[test]
    fn test_prior_annotator_may_resubmit() {
        assert_eq!(
            admit(&state(TaskStatus::Locked), 3, true, Role::Annotator),
            Ok(Admission::Resubmission)
        );
        assert!(!Admission::Resubmission.adds_annotator());
    }

    #[test]
    fn test_quota() {
        assert_eq!(
            admit(&state(TaskStatus::Unlocked), 2, false, Role::Annotator),
            Ok(Admission::NewAnnotator)
        );
        assert_eq!(
            admit(&state(TaskStatus::Completed), 3, false, Role::Annotator),
            Err(AdmissionError::QuotaExceeded {
                count: 3,
                required: 3
            })
        );
        assert_eq!(
            admit(&state(TaskStatus::Completed), 3, false, Role::PodLead),
            Ok(Admission::ReviewerOverride)
        );
    }
}
