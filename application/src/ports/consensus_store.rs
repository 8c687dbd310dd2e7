//! Consensus store port

use super::repository::RepositoryError;
use annotation_domain::{ConsensusAnnotation, DiscussionId, TaskId};
use async_trait::async_trait;

/// Port for the single consensus record of each (discussion, task)
#[async_trait]
pub trait ConsensusStore: Send + Sync {
    async fn get(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
    ) -> Result<Option<ConsensusAnnotation>, RepositoryError>;

    /// Store `consensus`, overwriting any prior record wholesale
    async fn save(&self, consensus: ConsensusAnnotation) -> Result<(), RepositoryError>;

    /// Store a draft unless a reviewer-authored record already exists.
    ///
    /// The check and the write must be atomic. Returns whether the draft
    /// was stored.
    async fn save_draft(&self, draft: ConsensusAnnotation) -> Result<bool, RepositoryError>;
}
