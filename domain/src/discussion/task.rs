//! The three sequential annotation tasks of a discussion.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One of the three sequential tasks every discussion goes through.
///
/// Task 3 is gated behind task 2, which is gated behind task 1. The number
/// of independent annotations required before a task completes is fixed
/// per task kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskId {
    #[serde(rename = "task1")]
    Task1,
    #[serde(rename = "task2")]
    Task2,
    #[serde(rename = "task3")]
    Task3,
}

impl TaskId {
    /// All tasks in pipeline order
    pub const ALL: [TaskId; 3] = [TaskId::Task1, TaskId::Task2, TaskId::Task3];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskId::Task1 => "task1",
            TaskId::Task2 => "task2",
            TaskId::Task3 => "task3",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskId::Task1 => "Task 1: Question Quality",
            TaskId::Task2 => "Task 2: Answer Quality",
            TaskId::Task3 => "Task 3: Rewrite",
        }
    }

    /// Number of independent annotations needed to complete the task
    pub fn required_annotators(&self) -> usize {
        match self {
            TaskId::Task1 | TaskId::Task2 => 3,
            TaskId::Task3 => 5,
        }
    }

    /// The task unlocked when this one is marked ready for next
    pub fn next(&self) -> Option<TaskId> {
        match self {
            TaskId::Task1 => Some(TaskId::Task2),
            TaskId::Task2 => Some(TaskId::Task3),
            TaskId::Task3 => None,
        }
    }

    /// 1-based position in the pipeline
    pub fn number(&self) -> u8 {
        match self {
            TaskId::Task1 => 1,
            TaskId::Task2 => 2,
            TaskId::Task3 => 3,
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task1" | "1" => Ok(TaskId::Task1),
            "task2" | "2" => Ok(TaskId::Task2),
            "task3" | "3" => Ok(TaskId::Task3),
            other => Err(DomainError::UnknownTask(other.to_string())),
        }
    }
}
