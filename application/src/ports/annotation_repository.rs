//! Annotation repository port
//!
//! Stores one annotation per (discussion, task, user) with upsert semantics.

use super::repository::RepositoryError;
use annotation_domain::{
    Annotation, AnnotationData, Discussion, DiscussionId, TaskId, TaskState, UserId,
};
use async_trait::async_trait;

/// One annotator submission together with the task state it produces
#[derive(Debug, Clone)]
pub struct Submission {
    pub discussion_id: DiscussionId,
    pub task_id: TaskId,
    pub user_id: UserId,
    pub data: AnnotationData,
    pub task_state: TaskState,
}

/// Result of [`AnnotationRepository::commit_submission`]
#[derive(Debug, Clone)]
pub struct CommittedSubmission {
    pub annotation: Annotation,
    pub discussion: Discussion,
}

/// Port for annotator submissions
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait AnnotationRepository: Send + Sync {
    /// Insert or wholesale replace the user's annotation for a task.
    ///
    /// The stored timestamp is refreshed on every call; old and new `data`
    /// are never merged.
    async fn upsert(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
        user_id: &UserId,
        data: AnnotationData,
    ) -> Result<Annotation, RepositoryError>;

    /// Upsert the annotation and overwrite the task's state in one write.
    ///
    /// Either both are stored or neither is. Fails with
    /// [`RepositoryError::NotFound`] for an unknown discussion.
    async fn commit_submission(
        &self,
        submission: Submission,
    ) -> Result<CommittedSubmission, RepositoryError>;

    /// All annotations of a task, ordered by timestamp then user id
    async fn list_by_task(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
    ) -> Result<Vec<Annotation>, RepositoryError>;

    async fn get(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
        user_id: &UserId,
    ) -> Result<Option<Annotation>, RepositoryError>;
}
