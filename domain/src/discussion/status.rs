//! Lifecycle status of a single task.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Status of a task within a discussion.
///
/// The normal path is `Locked → Unlocked → Completed`. Reviewers may then
/// move a completed task to `Rework`, `Blocked` or `ReadyForNext`; see
/// [`crate::lifecycle::transition`] for the full table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet open to annotators
    #[default]
    Locked,
    /// Open for annotation
    Unlocked,
    /// Annotator quota reached
    Completed,
    /// Sent back by a reviewer for corrections
    Rework,
    /// Stopped by a reviewer
    Blocked,
    /// Accepted by a reviewer; the next task is unlocked
    ReadyForNext,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Locked,
        TaskStatus::Unlocked,
        TaskStatus::Completed,
        TaskStatus::Rework,
        TaskStatus::Blocked,
        TaskStatus::ReadyForNext,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Locked => "locked",
            TaskStatus::Unlocked => "unlocked",
            TaskStatus::Completed => "completed",
            TaskStatus::Rework => "rework",
            TaskStatus::Blocked => "blocked",
            TaskStatus::ReadyForNext => "ready_for_next",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskStatus::Locked => "Locked",
            TaskStatus::Unlocked => "Unlocked",
            TaskStatus::Completed => "Completed",
            TaskStatus::Rework => "Rework",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::ReadyForNext => "Ready for next",
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, TaskStatus::Locked)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!("locked".parse::<TaskStatus>(), Ok(TaskStatus::Locked));
        assert_eq!(
            "ready-for-next".parse::<TaskStatus>(),
            Ok(TaskStatus::ReadyForNext)
        );
        assert_eq!(
            "Ready For Next".parse::<TaskStatus>(),
            Ok(TaskStatus::ReadyForNext)
        );
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::ReadyForNext).unwrap(),
            "\"ready_for_next\""
        );
    }
}
