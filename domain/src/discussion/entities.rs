//! Discussion entities

use super::status::TaskStatus;
use super::task::TaskId;
use crate::core::ids::DiscussionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of one task of a discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub status: TaskStatus,
    /// Number of distinct annotators who have submitted, derived from the
    /// stored annotations when the task is written
    pub annotator_count: usize,
    /// Fixed per task kind (see [`TaskId::required_annotators`])
    pub required_annotators: usize,
}

impl TaskState {
    pub fn new(task: TaskId, status: TaskStatus) -> Self {
        Self {
            status,
            annotator_count: 0,
            required_annotators: task.required_annotators(),
        }
    }

    /// Whether every annotator slot is taken
    pub fn is_full(&self) -> bool {
        self.annotator_count >= self.required_annotators
    }

    /// Remaining annotator slots
    pub fn open_slots(&self) -> usize {
        self.required_annotators.saturating_sub(self.annotator_count)
    }
}

/// The three task slots of a discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStates {
    pub task1: TaskState,
    pub task2: TaskState,
    pub task3: TaskState,
}

impl Default for TaskStates {
    /// Task 1 starts open; tasks 2 and 3 wait for the cascade.
    fn default() -> Self {
        Self {
            task1: TaskState::new(TaskId::Task1, TaskStatus::Unlocked),
            task2: TaskState::new(TaskId::Task2, TaskStatus::Locked),
            task3: TaskState::new(TaskId::Task3, TaskStatus::Locked),
        }
    }
}

impl TaskStates {
    pub fn get(&self, task: TaskId) -> &TaskState {
        match task {
            TaskId::Task1 => &self.task1,
            TaskId::Task2 => &self.task2,
            TaskId::Task3 => &self.task3,
        }
    }

    pub fn get_mut(&mut self, task: TaskId) -> &mut TaskState {
        match task {
            TaskId::Task1 => &mut self.task1,
            TaskId::Task2 => &mut self.task2,
            TaskId::Task3 => &mut self.task3,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &TaskState)> {
        TaskId::ALL.into_iter().map(move |task| (task, self.get(task)))
    }
}

/// A unit of work labelled by several annotators across three tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discussion {
    pub id: DiscussionId,
    pub title: String,
    /// Source URL of the discussion
    pub url: String,
    /// Repository the discussion belongs to (`owner/name`)
    pub repository: String,
    /// Primary language of the repository, if known
    #[serde(default)]
    pub language: Option<String>,
    /// Import batch the discussion arrived with
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Import time when the source omits it
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tasks: TaskStates,
}

impl Discussion {
    pub fn new(
        id: impl Into<DiscussionId>,
        title: impl Into<String>,
        url: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            repository: repository.into(),
            language: None,
            batch: None,
            tags: Vec::new(),
            created_at: Utc::now(),
            tasks: TaskStates::default(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn task(&self, task: TaskId) -> &TaskState {
        self.tasks.get(task)
    }

    pub fn task_mut(&mut self, task: TaskId) -> &mut TaskState {
        self.tasks.get_mut(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_discussion_initial_states() {
        let discussion = Discussion::new("d1", "Title", "https://example.com/d1", "acme/app");

        assert_eq!(discussion.task(TaskId::Task1).status, TaskStatus::Unlocked);
        assert_eq!(discussion.task(TaskId::Task2).status, TaskStatus::Locked);
        assert_eq!(discussion.task(TaskId::Task3).status, TaskStatus::Locked);
        assert_eq!(discussion.task(TaskId::Task3).required_annotators, 5);
        assert!(
            discussion
                .tasks
                .iter()
                .all(|(_, state)| state.annotator_count == 0)
        );
    }

    #[test]
    fn test_task_state_slots() {
        let mut state = TaskState::new(TaskId::Task1, TaskStatus::Unlocked);
        assert_eq!(state.open_slots(), 3);
        state.annotator_count = 3;
        assert!(state.is_full());
        assert_eq!(state.open_slots(), 0);
    }

    #[test]
    fn test_deserialize_without_tasks_uses_defaults() {
        let json = r#"{
            "id": "d7",
            "title": "How do I pin a dependency?",
            "url": "https://github.com/acme/app/discussions/7",
            "repository": "acme/app",
            "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let discussion: Discussion = serde_json::from_str(json).unwrap();

        assert_eq!(discussion.id.as_str(), "d7");
        assert!(discussion.language.is_none());
        assert_eq!(discussion.tasks, TaskStates::default());
    }
}
