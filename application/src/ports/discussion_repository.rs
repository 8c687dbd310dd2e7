//! Discussion repository port

use super::repository::RepositoryError;
use annotation_domain::{Discussion, DiscussionFilter, DiscussionId, TaskId, TaskState};
use async_trait::async_trait;

/// Port for discussions and their task states
#[async_trait]
pub trait DiscussionRepository: Send + Sync {
    async fn get(&self, id: &DiscussionId) -> Result<Option<Discussion>, RepositoryError>;

    /// Discussions matching `filter`, ordered by creation time then id
    async fn list(&self, filter: &DiscussionFilter) -> Result<Vec<Discussion>, RepositoryError>;

    /// Insert a new discussion. Returns `false` if the id already exists.
    async fn insert(&self, discussion: Discussion) -> Result<bool, RepositoryError>;

    /// Overwrite the given task slots only, leaving other tasks and
    /// metadata untouched, and return the updated discussion.
    ///
    /// Fails with [`RepositoryError::NotFound`] for an unknown id.
    async fn update_task_states(
        &self,
        id: &DiscussionId,
        states: &[(TaskId, TaskState)],
    ) -> Result<Discussion, RepositoryError>;
}
