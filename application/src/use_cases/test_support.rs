//! In-memory port implementations for use case tests.

use crate::ports::annotation_repository::{AnnotationRepository, CommittedSubmission, Submission};
use crate::ports::consensus_store::ConsensusStore;
use crate::ports::discussion_repository::DiscussionRepository;
use crate::ports::repository::RepositoryError;
use annotation_domain::{
    Annotation, AnnotationData, ConsensusAnnotation, Discussion, DiscussionFilter, DiscussionId,
    TaskId, TaskState, UserId,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) fn discussion(id: &str) -> Discussion {
    Discussion::new(
        id,
        format!("Discussion {id}"),
        format!("https://github.com/acme/app/discussions/{id}"),
        "acme/app",
    )
}

#[derive(Default)]
pub(crate) struct InMemory {
    discussions: Mutex<HashMap<DiscussionId, Discussion>>,
    annotations: Mutex<Vec<Annotation>>,
    consensus: Mutex<HashMap<(DiscussionId, TaskId), ConsensusAnnotation>>,
    fail_commits: AtomicBool,
    next_draft_delay_ms: AtomicU64,
}

impl InMemory {
    pub(crate) fn with(discussion: Discussion) -> Arc<Self> {
        let store = Self::default();
        store
            .discussions
            .lock()
            .unwrap()
            .insert(discussion.id.clone(), discussion);
        Arc::new(store)
    }

    pub(crate) fn discussion(&self, id: &str) -> Discussion {
        self.discussions.lock().unwrap()[&DiscussionId::new(id)].clone()
    }

    pub(crate) fn annotation(&self, id: &str, task: TaskId, user: &str) -> Option<Annotation> {
        self.annotations
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.discussion_id.as_str() == id && a.task_id == task && a.user_id.as_str() == user)
            .cloned()
    }

    fn store_annotation(&self, annotation: Annotation) {
        let mut annotations = self.annotations.lock().unwrap();
        annotations.retain(|a| {
            !(a.discussion_id == annotation.discussion_id
                && a.task_id == annotation.task_id
                && a.user_id == annotation.user_id)
        });
        annotations.push(annotation);
    }

    pub(crate) fn annotation_count(&self) -> usize {
        self.annotations.lock().unwrap().len()
    }

    pub(crate) fn consensus_for(&self, id: &str, task: TaskId) -> Option<ConsensusAnnotation> {
        self.consensus
            .lock()
            .unwrap()
            .get(&(DiscussionId::new(id), task))
            .cloned()
    }

    pub(crate) fn put_reviewer_consensus(&self, id: &str, task: TaskId, user: &str) {
        let record = ConsensusAnnotation::reviewed(id, task, user, AnnotationData::new());
        self.consensus
            .lock()
            .unwrap()
            .insert((DiscussionId::new(id), task), record);
    }

    pub(crate) fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Hold the next draft save for `delay`
    pub(crate) fn delay_next_draft(&self, delay: Duration) {
        self.next_draft_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl DiscussionRepository for InMemory {
    async fn get(&self, id: &DiscussionId) -> Result<Option<Discussion>, RepositoryError> {
        Ok(self.discussions.lock().unwrap().get(id).cloned())
    }

    async fn list(&self, filter: &DiscussionFilter) -> Result<Vec<Discussion>, RepositoryError> {
        let mut found: Vec<Discussion> = self
            .discussions
            .lock()
            .unwrap()
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn insert(&self, discussion: Discussion) -> Result<bool, RepositoryError> {
        let mut discussions = self.discussions.lock().unwrap();
        if discussions.contains_key(&discussion.id) {
            return Ok(false);
        }
        discussions.insert(discussion.id.clone(), discussion);
        Ok(true)
    }

    async fn update_task_states(
        &self,
        id: &DiscussionId,
        states: &[(TaskId, TaskState)],
    ) -> Result<Discussion, RepositoryError> {
        let mut discussions = self.discussions.lock().unwrap();
        let discussion = discussions
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        for (task, state) in states {
            *discussion.task_mut(*task) = state.clone();
        }
        Ok(discussion.clone())
    }
}

#[async_trait]
impl AnnotationRepository for InMemory {
    async fn upsert(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
        user_id: &UserId,
        data: AnnotationData,
    ) -> Result<Annotation, RepositoryError> {
        // Give concurrent submitters a chance to interleave
        tokio::task::yield_now().await;
        let annotation = Annotation::new(discussion_id.clone(), task_id, user_id.clone(), data)
            .with_timestamp(Utc::now());
        self.store_annotation(annotation.clone());
        Ok(annotation)
    }

    async fn commit_submission(
        &self,
        submission: Submission,
    ) -> Result<CommittedSubmission, RepositoryError> {
        tokio::task::yield_now().await;
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("disk full".to_string()));
        }

        let Submission {
            discussion_id,
            task_id,
            user_id,
            data,
            task_state,
        } = submission;
        let mut discussions = self.discussions.lock().unwrap();
        let discussion = discussions
            .get_mut(&discussion_id)
            .ok_or_else(|| RepositoryError::NotFound(discussion_id.to_string()))?;
        *discussion.task_mut(task_id) = task_state;

        let annotation =
            Annotation::new(discussion_id, task_id, user_id, data).with_timestamp(Utc::now());
        self.store_annotation(annotation.clone());
        Ok(CommittedSubmission {
            annotation,
            discussion: discussion.clone(),
        })
    }

    async fn list_by_task(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
    ) -> Result<Vec<Annotation>, RepositoryError> {
        tokio::task::yield_now().await;
        let mut found: Vec<Annotation> = self
            .annotations
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.discussion_id == *discussion_id && a.task_id == task_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(found)
    }

    async fn get(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
        user_id: &UserId,
    ) -> Result<Option<Annotation>, RepositoryError> {
        Ok(self
            .annotations
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.discussion_id == *discussion_id && a.task_id == task_id && a.user_id == *user_id)
            .cloned())
    }
}

#[async_trait]
impl ConsensusStore for InMemory {
    async fn get(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
    ) -> Result<Option<ConsensusAnnotation>, RepositoryError> {
        Ok(self
            .consensus
            .lock()
            .unwrap()
            .get(&(discussion_id.clone(), task_id))
            .cloned())
    }

    async fn save(&self, consensus: ConsensusAnnotation) -> Result<(), RepositoryError> {
        self.consensus
            .lock()
            .unwrap()
            .insert((consensus.discussion_id.clone(), consensus.task_id), consensus);
        Ok(())
    }

    async fn save_draft(&self, draft: ConsensusAnnotation) -> Result<bool, RepositoryError> {
        let delay = self.next_draft_delay_ms.swap(0, Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let mut consensus = self.consensus.lock().unwrap();
        let key = (draft.discussion_id.clone(), draft.task_id);
        if consensus.get(&key).is_some_and(|c| !c.is_draft()) {
            return Ok(false);
        }
        consensus.insert(key, draft);
        Ok(true)
    }
}
