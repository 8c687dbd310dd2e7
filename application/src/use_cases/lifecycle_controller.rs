//! Task lifecycle controller
//!
//! Owns submissions and status changes. Each operation runs inside the
//! per-task critical section of [`TaskLocks`]: the authoritative annotator
//! count is recomputed from the stored annotations there, and the resulting
//! status change and annotation are committed in a single store write.

use crate::config::ConsensusConfig;
use crate::ports::annotation_repository::{AnnotationRepository, CommittedSubmission, Submission};
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::consensus_store::ConsensusStore;
use crate::ports::discussion_repository::DiscussionRepository;
use crate::ports::lifecycle_notifier::{LifecycleNotifier, NoLifecycleNotifier};
use crate::ports::repository::RepositoryError;
use crate::use_cases::task_locks::TaskLocks;
use annotation_domain::lifecycle::touched_tasks;
use annotation_domain::{
    Actor, Admission, AdmissionError, Annotation, AnnotationData, ConsensusResult, Discussion,
    DiscussionId, DomainError, TaskEvent, TaskId, TaskSchema, TaskState, TaskStatus, Transition,
    Trigger, admit, apply_cascade, apply_event,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during lifecycle operations
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Task {task} of discussion {discussion_id} is locked")]
    TaskLocked {
        discussion_id: DiscussionId,
        task: TaskId,
    },

    #[error("Task {task} of discussion {discussion_id} already has {count}/{required} annotators")]
    QuotaExceeded {
        discussion_id: DiscussionId,
        task: TaskId,
        count: usize,
        required: usize,
    },

    #[error("Role '{role}' may not {action}")]
    Forbidden { role: String, action: &'static str },

    #[error("Invalid transition for {task}: {from} -> {to}")]
    InvalidTransition {
        task: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("Discussion not found: {0}")]
    DiscussionNotFound(DiscussionId),

    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(#[source] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl LifecycleError {
    fn rejected(discussion_id: &DiscussionId, task: TaskId, err: AdmissionError) -> Self {
        match err {
            AdmissionError::TaskLocked => LifecycleError::TaskLocked {
                discussion_id: discussion_id.clone(),
                task,
            },
            AdmissionError::QuotaExceeded { count, required } => LifecycleError::QuotaExceeded {
                discussion_id: discussion_id.clone(),
                task,
                count,
                required,
            },
        }
    }

    fn invalid_transition(task: TaskId, from: TaskStatus, to: TaskStatus) -> Self {
        LifecycleError::InvalidTransition { task, from, to }
    }
}

/// Input for [`TaskLifecycleController::submit`]
#[derive(Debug, Clone)]
pub struct SubmitInput {
    pub discussion_id: DiscussionId,
    pub task: TaskId,
    pub actor: Actor,
    pub data: AnnotationData,
}

impl SubmitInput {
    pub fn new(
        discussion_id: impl Into<DiscussionId>,
        task: TaskId,
        actor: Actor,
        data: AnnotationData,
    ) -> Self {
        Self {
            discussion_id: discussion_id.into(),
            task,
            actor,
            data,
        }
    }
}

/// What a successful submission did
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The stored annotation, after the N/A cascade
    pub annotation: Annotation,
    pub admission: Admission,
    /// Discussion after the commit
    pub discussion: Discussion,
    /// Authoritative annotator count of the task
    pub annotator_count: usize,
    /// Status changes caused by the submission
    pub transitions: Vec<Transition>,
    /// Fields set to N/A by the cascade rules
    pub cascaded: Vec<String>,
    /// Aggregated consensus, present once the quota is reached
    pub consensus: Option<ConsensusResult>,
    /// Whether the aggregated consensus was stored as a draft
    pub draft_saved: bool,
}

impl SubmitOutcome {
    pub fn quota_reached(&self) -> bool {
        self.consensus.is_some()
    }
}

/// Use case owning task status, annotator counts and unlock cascades
pub struct TaskLifecycleController {
    discussions: Arc<dyn DiscussionRepository>,
    annotations: Arc<dyn AnnotationRepository>,
    consensus: Arc<dyn ConsensusStore>,
    locks: Arc<TaskLocks>,
    config: ConsensusConfig,
    notifier: Arc<dyn LifecycleNotifier>,
    audit: Arc<dyn AuditLogger>,
}

impl TaskLifecycleController {
    pub fn new(
        discussions: Arc<dyn DiscussionRepository>,
        annotations: Arc<dyn AnnotationRepository>,
        consensus: Arc<dyn ConsensusStore>,
    ) -> Self {
        Self {
            discussions,
            annotations,
            consensus,
            locks: Arc::new(TaskLocks::new()),
            config: ConsensusConfig::default(),
            notifier: Arc::new(NoLifecycleNotifier),
            audit: Arc::new(NoAuditLogger),
        }
    }

    /// Share a lock registry with other controllers over the same store
    pub fn with_locks(mut self, locks: Arc<TaskLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_config(mut self, config: ConsensusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn LifecycleNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Submit (or resubmit) an annotation.
    ///
    /// The N/A cascade is applied and the data validated before anything is
    /// locked. Inside the critical section the submission is admitted, the
    /// count recomputed, the task completed if the quota is reached, the
    /// task state and annotation committed in one write, and the draft
    /// consensus refreshed.
    pub async fn submit(&self, input: SubmitInput) -> Result<SubmitOutcome, LifecycleError> {
        let SubmitInput {
            discussion_id,
            task,
            actor,
            mut data,
        } = input;

        let schema = TaskSchema::for_task(task);
        let cascaded = apply_cascade(&schema, &mut data);
        if !cascaded.is_empty() {
            debug!("Cascade set {} field(s) to N/A: {:?}", cascaded.len(), cascaded);
        }
        schema
            .validate(&data)
            .map_err(LifecycleError::InvalidAnnotation)?;

        let guard = self.locks.acquire(&discussion_id, task).await;

        let discussion = self
            .discussions
            .get(&discussion_id)
            .await?
            .ok_or_else(|| LifecycleError::DiscussionNotFound(discussion_id.clone()))?;
        let existing = self.annotations.list_by_task(&discussion_id, task).await?;
        let has_prior = existing.iter().any(|a| a.user_id == actor.user_id);

        let admission = admit(discussion.task(task), existing.len(), has_prior, actor.role)
            .map_err(|e| LifecycleError::rejected(&discussion_id, task, e))?;

        let count = if admission.adds_annotator() {
            existing.len() + 1
        } else {
            existing.len()
        };
        let required = discussion.task(task).required_annotators;

        let mut updated = discussion;
        updated.task_mut(task).annotator_count = count;
        let transitions = if count >= required {
            apply_event(&mut updated, task, TaskEvent::QuotaReached)
                .map_err(LifecycleError::InvalidAnnotation)?
        } else {
            Vec::new()
        };

        let CommittedSubmission {
            annotation,
            discussion: committed,
        } = self
            .annotations
            .commit_submission(Submission {
                discussion_id: discussion_id.clone(),
                task_id: task,
                user_id: actor.user_id.clone(),
                data,
                task_state: updated.task(task).clone(),
            })
            .await?;

        // The draft is refreshed before the guard is released so that drafts
        // are stored in submission order.
        let consensus = if count >= required {
            let snapshot = Self::snapshot(existing, &annotation);
            Some(self.config.aggregator().aggregate(&schema, &snapshot))
        } else {
            None
        };
        let draft_saved = match &consensus {
            Some(result) => self.store_draft(&discussion_id, task, result).await,
            None => false,
        };

        drop(guard);

        info!(
            "{} submitted {}/{} ({}/{})",
            actor.user_id, discussion_id, task, count, required
        );
        self.notifier
            .on_submitted(&discussion_id, task, &actor.user_id, count, required);
        self.audit.log(AuditEvent::new(
            "annotation_submitted",
            json!({
                "discussion_id": discussion_id,
                "task": task,
                "user_id": actor.user_id,
                "role": actor.role,
                "resubmission": !admission.adds_annotator(),
                "annotator_count": count,
                "required": required,
                "cascaded": cascaded,
            }),
        ));
        self.report_transitions(&discussion_id, &transitions);

        if let Some(result) = &consensus {
            info!(
                "Quota reached for {}/{}: {}",
                discussion_id,
                task,
                result.status()
            );
            self.notifier.on_quota_reached(&discussion_id, task, result);
        }

        Ok(SubmitOutcome {
            annotation,
            admission,
            discussion: committed,
            annotator_count: count,
            transitions,
            cascaded,
            consensus,
            draft_saved,
        })
    }

    /// Set a task's status explicitly. Reviewers only.
    ///
    /// Holds the task's guard and the next task's guard, because
    /// `ready_for_next` may unlock the next task.
    pub async fn set_status(
        &self,
        discussion_id: &DiscussionId,
        task: TaskId,
        status: TaskStatus,
        actor: &Actor,
    ) -> Result<Discussion, LifecycleError> {
        if !actor.is_reviewer() {
            return Err(LifecycleError::Forbidden {
                role: actor.role.to_string(),
                action: "change task status",
            });
        }

        let _guard = self.locks.acquire_with_next(discussion_id, task).await;

        let mut discussion = self
            .discussions
            .get(discussion_id)
            .await?
            .ok_or_else(|| LifecycleError::DiscussionNotFound(discussion_id.clone()))?;

        let from = discussion.task(task).status;
        let transitions = apply_event(&mut discussion, task, TaskEvent::SetByReviewer(status))
            .map_err(|e| match e {
                DomainError::InvalidTransition { .. } => {
                    LifecycleError::invalid_transition(task, from, status)
                }
                other => LifecycleError::InvalidAnnotation(other),
            })?;

        let states: Vec<(TaskId, TaskState)> = touched_tasks(&transitions)
            .into_iter()
            .map(|t| (t, discussion.task(t).clone()))
            .collect();
        let committed = self
            .discussions
            .update_task_states(discussion_id, &states)
            .await?;

        info!(
            "{} set {}/{} from {} to {}",
            actor.user_id, discussion_id, task, from, status
        );
        for transition in &transitions {
            if transition.trigger == Trigger::Reviewer {
                self.audit.log(AuditEvent::new(
                    "task_status_changed",
                    json!({
                        "discussion_id": discussion_id,
                        "task": transition.task,
                        "from": transition.from,
                        "to": transition.to,
                        "user_id": actor.user_id,
                        "role": actor.role,
                    }),
                ));
                self.notifier.on_status_changed(discussion_id, transition);
            }
        }
        self.report_transitions(
            discussion_id,
            &transitions
                .iter()
                .copied()
                .filter(|t| t.trigger != Trigger::Reviewer)
                .collect::<Vec<_>>(),
        );

        Ok(committed)
    }

    /// Audit and notify automatic transitions (quota, cascade)
    fn report_transitions(&self, discussion_id: &DiscussionId, transitions: &[Transition]) {
        for transition in transitions {
            let event_type = match transition.trigger {
                Trigger::Cascade => "task_unlocked",
                Trigger::Quota | Trigger::Reviewer => "task_status_changed",
            };
            info!(
                "{}/{}: {} -> {} ({})",
                discussion_id, transition.task, transition.from, transition.to, transition.trigger
            );
            self.audit.log(AuditEvent::new(
                event_type,
                json!({
                    "discussion_id": discussion_id,
                    "task": transition.task,
                    "from": transition.from,
                    "to": transition.to,
                    "trigger": transition.trigger,
                }),
            ));
            self.notifier.on_status_changed(discussion_id, transition);
        }
    }

    /// Annotations as committed: the earlier list with the caller's entry replaced
    fn snapshot(existing: Vec<Annotation>, stored: &Annotation) -> Vec<Annotation> {
        let mut snapshot: Vec<Annotation> = existing
            .into_iter()
            .filter(|a| a.user_id != stored.user_id)
            .collect();
        snapshot.push(stored.clone());
        snapshot
    }

    async fn store_draft(&self, discussion_id: &DiscussionId, task: TaskId, result: &ConsensusResult) -> bool {
        if !self.config.auto_draft {
            return false;
        }

        let draft = result.clone().into_draft(discussion_id.clone(), task);
        match self.consensus.save_draft(draft).await {
            Ok(true) => {
                self.audit.log(AuditEvent::new(
                    "consensus_drafted",
                    json!({
                        "discussion_id": discussion_id,
                        "task": task,
                        "agreement": result.agreement,
                        "annotators": result.annotators,
                    }),
                ));
                true
            }
            Ok(false) => {
                debug!("Reviewer consensus exists for {}/{}, draft not stored", discussion_id, task);
                false
            }
            Err(e) => {
                // The submission itself is committed; the draft can be recomputed
                warn!("Storing draft consensus for {}/{} failed: {}", discussion_id, task, e);
                false
            }
        }
    }
}
