//! Query discussions use case

use crate::ports::annotation_repository::AnnotationRepository;
use crate::ports::consensus_store::ConsensusStore;
use crate::ports::discussion_repository::DiscussionRepository;
use crate::ports::repository::RepositoryError;
use annotation_domain::{
    ConsensusAnnotation, Discussion, DiscussionFilter, DiscussionId, TaskId, TaskState, UserId,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Discussion not found: {0}")]
    DiscussionNotFound(DiscussionId),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One task of a discussion with who worked on it
#[derive(Debug, Clone, Serialize)]
pub struct TaskOverview {
    pub task: TaskId,
    pub state: TaskState,
    /// Annotators in submission order
    pub annotators: Vec<UserId>,
    pub consensus: Option<ConsensusAnnotation>,
}

/// A discussion with per-task detail
#[derive(Debug, Clone, Serialize)]
pub struct DiscussionOverview {
    pub discussion: Discussion,
    pub tasks: Vec<TaskOverview>,
}

/// Use case for listing and inspecting discussions
pub struct QueryDiscussionsUseCase {
    discussions: Arc<dyn DiscussionRepository>,
    annotations: Arc<dyn AnnotationRepository>,
    consensus: Arc<dyn ConsensusStore>,
}

impl QueryDiscussionsUseCase {
    pub fn new(
        discussions: Arc<dyn DiscussionRepository>,
        annotations: Arc<dyn AnnotationRepository>,
        consensus: Arc<dyn ConsensusStore>,
    ) -> Self {
        Self {
            discussions,
            annotations,
            consensus,
        }
    }

    pub async fn list(&self, filter: &DiscussionFilter) -> Result<Vec<Discussion>, QueryError> {
        Ok(self.discussions.list(filter).await?)
    }

    pub async fn overview(&self, id: &DiscussionId) -> Result<DiscussionOverview, QueryError> {
        let discussion = self
            .discussions
            .get(id)
            .await?
            .ok_or_else(|| QueryError::DiscussionNotFound(id.clone()))?;

        let mut tasks = Vec::with_capacity(TaskId::ALL.len());
        for task in TaskId::ALL {
            let annotators = self
                .annotations
                .list_by_task(id, task)
                .await?
                .into_iter()
                .map(|a| a.user_id)
                .collect();
            tasks.push(TaskOverview {
                task,
                state: discussion.task(task).clone(),
                annotators,
                consensus: self.consensus.get(id, task).await?,
            });
        }

        Ok(DiscussionOverview { discussion, tasks })
    }
}
