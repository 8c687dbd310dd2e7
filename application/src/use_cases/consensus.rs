//! Consensus use cases
//!
//! - [`ComputeConsensusUseCase`] reads the stored record or aggregates on demand
//! - [`SaveConsensusUseCase`] lets a reviewer author or override the record

use crate::config::ConsensusConfig;
use crate::ports::annotation_repository::AnnotationRepository;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::consensus_store::ConsensusStore;
use crate::ports::discussion_repository::DiscussionRepository;
use crate::ports::repository::RepositoryError;
use annotation_domain::{
    Actor, AgreementStatus, AnnotationData, ConsensusAnnotation, ConsensusResult, DiscussionId,
    DomainError, TaskId, TaskSchema,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur in consensus use cases
#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("Role '{role}' may not save consensus")]
    Forbidden { role: String },

    #[error("Discussion not found: {0}")]
    DiscussionNotFound(DiscussionId),

    #[error("Invalid consensus data: {0}")]
    InvalidAnnotation(#[source] DomainError),

    #[error("Invalid star rating {0} (expected 1-5)")]
    InvalidRating(u8),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Use case for reading and computing consensus
pub struct ComputeConsensusUseCase {
    discussions: Arc<dyn DiscussionRepository>,
    annotations: Arc<dyn AnnotationRepository>,
    consensus: Arc<dyn ConsensusStore>,
    config: ConsensusConfig,
}

impl ComputeConsensusUseCase {
    pub fn new(
        discussions: Arc<dyn DiscussionRepository>,
        annotations: Arc<dyn AnnotationRepository>,
        consensus: Arc<dyn ConsensusStore>,
    ) -> Self {
        Self {
            discussions,
            annotations,
            consensus,
            config: ConsensusConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ConsensusConfig) -> Self {
        self.config = config;
        self
    }

    /// The stored consensus record, if any
    pub async fn get(
        &self,
        discussion_id: &DiscussionId,
        task: TaskId,
    ) -> Result<Option<ConsensusAnnotation>, ConsensusError> {
        Ok(self.consensus.get(discussion_id, task).await?)
    }

    /// Aggregate the current annotations without saving anything
    pub async fn compute(
        &self,
        discussion_id: &DiscussionId,
        task: TaskId,
    ) -> Result<ConsensusResult, ConsensusError> {
        if self.discussions.get(discussion_id).await?.is_none() {
            return Err(ConsensusError::DiscussionNotFound(discussion_id.clone()));
        }

        let annotations = self.annotations.list_by_task(discussion_id, task).await?;
        debug!(
            "Aggregating {} annotation(s) for {}/{} ({})",
            annotations.len(),
            discussion_id,
            task,
            self.config.rule
        );
        Ok(self
            .config
            .aggregator()
            .aggregate(&TaskSchema::for_task(task), &annotations))
    }
}

/// Input for [`SaveConsensusUseCase::execute`]
#[derive(Debug, Clone)]
pub struct SaveConsensusInput {
    pub discussion_id: DiscussionId,
    pub task: TaskId,
    pub data: AnnotationData,
    pub stars: Option<u8>,
    pub comment: Option<String>,
}

impl SaveConsensusInput {
    pub fn new(discussion_id: impl Into<DiscussionId>, task: TaskId, data: AnnotationData) -> Self {
        Self {
            discussion_id: discussion_id.into(),
            task,
            data,
            stars: None,
            comment: None,
        }
    }

    pub fn with_stars(mut self, stars: u8) -> Self {
        self.stars = Some(stars);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Use case for reviewer-authored consensus records
pub struct SaveConsensusUseCase {
    discussions: Arc<dyn DiscussionRepository>,
    consensus: Arc<dyn ConsensusStore>,
    audit: Arc<dyn AuditLogger>,
}

impl SaveConsensusUseCase {
    pub fn new(discussions: Arc<dyn DiscussionRepository>, consensus: Arc<dyn ConsensusStore>) -> Self {
        Self {
            discussions,
            consensus,
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Save the record, overwriting any prior one wholesale.
    ///
    /// Only reviewers may save. The data is validated against the task
    /// schema like a submission.
    pub async fn execute(
        &self,
        input: SaveConsensusInput,
        actor: &Actor,
    ) -> Result<ConsensusAnnotation, ConsensusError> {
        if !actor.is_reviewer() {
            return Err(ConsensusError::Forbidden {
                role: actor.role.to_string(),
            });
        }

        let schema = TaskSchema::for_task(input.task);
        schema
            .validate(&input.data)
            .map_err(ConsensusError::InvalidAnnotation)?;

        if self.discussions.get(&input.discussion_id).await?.is_none() {
            return Err(ConsensusError::DiscussionNotFound(input.discussion_id));
        }

        // The reviewer's own agreement label, if they set one
        let agreement = input
            .data
            .text(schema.consensus_key())
            .map(|label| label == AgreementStatus::Agreement.label());

        let record = ConsensusAnnotation::reviewed(
            input.discussion_id.clone(),
            input.task,
            actor.user_id.clone(),
            input.data,
        )
        .with_stars(input.stars)
        .map_err(|e| match e {
            DomainError::InvalidRating(stars) => ConsensusError::InvalidRating(stars),
            other => ConsensusError::InvalidAnnotation(other),
        })?
        .with_comment(input.comment)
        .with_agreement(agreement);

        self.consensus.save(record.clone()).await?;

        info!(
            "{} saved consensus for {}/{}",
            actor.user_id, record.discussion_id, record.task_id
        );
        self.audit.log(AuditEvent::new(
            "consensus_saved",
            json!({
                "discussion_id": record.discussion_id,
                "task": record.task_id,
                "user_id": actor.user_id,
                "role": actor.role,
                "stars": record.stars,
                "agreement": record.agreement,
            }),
        ));

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{InMemory, discussion};
    use annotation_domain::{AgreementRule, Role};

    fn save_use_case(store: &Arc<InMemory>) -> SaveConsensusUseCase {
        SaveConsensusUseCase::new(store.clone(), store.clone())
    }

    fn compute_use_case(store: &Arc<InMemory>) -> ComputeConsensusUseCase {
        ComputeConsensusUseCase::new(store.clone(), store.clone(), store.clone())
    }

    async fn annotate(store: &Arc<InMemory>, user: &str, value: &str) {
        AnnotationRepository::upsert(
            store.as_ref(),
            &DiscussionId::new("d1"),
            TaskId::Task1,
            &user.into(),
            AnnotationData::new().with("relevance", value),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_annotator_cannot_save() {
        let store = InMemory::with(discussion("d1"));
        let err = save_use_case(&store)
            .execute(
                SaveConsensusInput::new("d1", TaskId::Task1, AnnotationData::new()),
                &Actor::annotator("alice"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ConsensusError::Forbidden { .. }));
        assert!(store.consensus_for("d1", TaskId::Task1).is_none());
    }

    #[tokio::test]
    async fn test_reviewer_save_overwrites_draft() {
        let store = InMemory::with(discussion("d1"));
        let draft = ConsensusAnnotation::draft("d1", TaskId::Task1, AnnotationData::new(), false);
        ConsensusStore::save(store.as_ref(), draft).await.unwrap();

        let data = AnnotationData::new()
            .with("relevance", "Yes")
            .with("consensus", "Agreement");
        let saved = save_use_case(&store)
            .execute(
                SaveConsensusInput::new("d1", TaskId::Task1, data)
                    .with_stars(4)
                    .with_comment("Clear question"),
                &Actor::new("lead", Role::PodLead),
            )
            .await
            .unwrap();

        assert_eq!(saved.stars, Some(4));
        assert_eq!(saved.agreement, Some(true));

        let stored = store.consensus_for("d1", TaskId::Task1).unwrap();
        assert!(!stored.is_draft());
        assert_eq!(stored.user_id.as_str(), "lead");
        assert_eq!(stored.comment.as_deref(), Some("Clear question"));
    }

    #[tokio::test]
    async fn test_invalid_stars_and_data() {
        let store = InMemory::with(discussion("d1"));
        let use_case = save_use_case(&store);
        let admin = Actor::new("root", Role::Admin);

        let err = use_case
            .execute(
                SaveConsensusInput::new("d1", TaskId::Task1, AnnotationData::new()).with_stars(6),
                &admin,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ConsensusError::InvalidRating(6)));

        let err = use_case
            .execute(
                SaveConsensusInput::new(
                    "d1",
                    TaskId::Task1,
                    AnnotationData::new().with("relevance", "Perhaps"),
                ),
                &admin,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ConsensusError::InvalidAnnotation(_)));

        let err = use_case
            .execute(
                SaveConsensusInput::new("missing", TaskId::Task1, AnnotationData::new()),
                &admin,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ConsensusError::DiscussionNotFound(_)));
    }

    #[tokio::test]
    async fn test_compute_does_not_save() {
        let store = InMemory::with(discussion("d1"));
        annotate(&store, "alice", "Yes").await;
        annotate(&store, "bob", "No").await;

        let result = compute_use_case(&store)
            .compute(&DiscussionId::new("d1"), TaskId::Task1)
            .await
            .unwrap();

        assert_eq!(result.annotators, 2);
        assert!(!result.agreement);
        assert!(store.consensus_for("d1", TaskId::Task1).is_none());
    }

    #[tokio::test]
    async fn test_compute_uses_configured_rule() {
        let store = InMemory::with(discussion("d1"));
        annotate(&store, "alice", "Yes").await;
        annotate(&store, "bob", "Yes").await;
        annotate(&store, "carol", "No").await;

        let majority = compute_use_case(&store)
            .compute(&DiscussionId::new("d1"), TaskId::Task1)
            .await
            .unwrap();
        assert!(majority.agreement);

        let unanimous = compute_use_case(&store)
            .with_config(ConsensusConfig::default().with_rule(AgreementRule::Unanimous))
            .compute(&DiscussionId::new("d1"), TaskId::Task1)
            .await
            .unwrap();
        assert!(!unanimous.agreement);
    }
}
