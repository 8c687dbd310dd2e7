//! Local store adapter.
//!
//! Keeps discussions, annotations and consensus records in memory and, when
//! opened on a path, rewrites a JSON snapshot after every change. Writes go
//! to a temporary sibling file that is then renamed over the snapshot.

use super::error::StoreError;
use super::snapshot::StoreState;
use annotation_application::{
    AnnotationRepository, CommittedSubmission, ConsensusStore, DiscussionRepository,
    RepositoryError, Submission,
};
use annotation_domain::{
    Annotation, AnnotationData, ConsensusAnnotation, Discussion, DiscussionFilter, DiscussionId,
    TaskId, TaskState, UserId,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// In-memory store with optional JSON persistence
pub struct LocalStore {
    state: Mutex<StoreState>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            path: None,
        }
    }

    /// Open the snapshot at `path`, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = if path.exists() {
            let state = StoreState::load(&path)?;
            info!(
                "Loaded {} discussion(s) and {} annotation(s) from {}",
                state.discussions.len(),
                state.annotations.len(),
                path.display()
            );
            state
        } else {
            debug!("No snapshot at {}, starting empty", path.display());
            StoreState::default()
        };

        Ok(Self {
            state: Mutex::new(state),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Apply `change` and persist. If persisting fails the change is undone.
    async fn mutate<R>(
        &self,
        change: impl FnOnce(&mut StoreState) -> Result<R, RepositoryError>,
    ) -> Result<R, RepositoryError> {
        let mut state = self.state.lock().await;
        let Some(path) = &self.path else {
            return change(&mut *state);
        };

        let backup = state.clone();
        let result = change(&mut *state)?;
        if let Err(e) = Self::persist(path, &*state).await {
            *state = backup;
            return Err(e.into());
        }
        Ok(result)
    }

    async fn persist(path: &Path, state: &StoreState) -> Result<(), StoreError> {
        let bytes = state.to_json(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StoreError::io(path, e))
    }
}

#[async_trait]
impl DiscussionRepository for LocalStore {
    async fn get(&self, id: &DiscussionId) -> Result<Option<Discussion>, RepositoryError> {
        Ok(self.state.lock().await.discussions.get(id).cloned())
    }

    async fn list(&self, filter: &DiscussionFilter) -> Result<Vec<Discussion>, RepositoryError> {
        let state = self.state.lock().await;
        let mut found: Vec<Discussion> = state
            .discussions
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn insert(&self, discussion: Discussion) -> Result<bool, RepositoryError> {
        self.mutate(|state| {
            if state.discussions.contains_key(&discussion.id) {
                return Ok(false);
            }
            state.discussions.insert(discussion.id.clone(), discussion);
            Ok(true)
        })
        .await
    }

    async fn update_task_states(
        &self,
        id: &DiscussionId,
        states: &[(TaskId, TaskState)],
    ) -> Result<Discussion, RepositoryError> {
        self.mutate(|state| {
            let discussion = state
                .discussions
                .get_mut(id)
                .ok_or_else(|| RepositoryError::NotFound(format!("discussion {}", id)))?;
            for (task, task_state) in states {
                *discussion.task_mut(*task) = task_state.clone();
            }
            Ok(discussion.clone())
        })
        .await
    }
}

#[async_trait]
impl AnnotationRepository for LocalStore {
    async fn upsert(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
        user_id: &UserId,
        data: AnnotationData,
    ) -> Result<Annotation, RepositoryError> {
        let annotation = Annotation::new(discussion_id.clone(), task_id, user_id.clone(), data);
        self.mutate(|state| {
            state.annotations.insert(
                (discussion_id.clone(), task_id, user_id.clone()),
                annotation.clone(),
            );
            Ok(annotation)
        })
        .await
    }

    async fn commit_submission(
        &self,
        submission: Submission,
    ) -> Result<CommittedSubmission, RepositoryError> {
        let Submission {
            discussion_id,
            task_id,
            user_id,
            data,
            task_state,
        } = submission;
        let annotation = Annotation::new(discussion_id.clone(), task_id, user_id.clone(), data);
        self.mutate(|state| {
            let discussion = state
                .discussions
                .get_mut(&discussion_id)
                .ok_or_else(|| RepositoryError::NotFound(format!("discussion {}", discussion_id)))?;
            *discussion.task_mut(task_id) = task_state;
            let discussion = discussion.clone();
            state
                .annotations
                .insert((discussion_id, task_id, user_id), annotation.clone());
            Ok(CommittedSubmission {
                annotation,
                discussion,
            })
        })
        .await
    }

    async fn list_by_task(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
    ) -> Result<Vec<Annotation>, RepositoryError> {
        let state = self.state.lock().await;
        let mut found: Vec<Annotation> = state
            .annotations
            .values()
            .filter(|a| a.discussion_id == *discussion_id && a.task_id == task_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(found)
    }

    async fn get(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
        user_id: &UserId,
    ) -> Result<Option<Annotation>, RepositoryError> {
        let key = (discussion_id.clone(), task_id, user_id.clone());
        Ok(self.state.lock().await.annotations.get(&key).cloned())
    }
}

#[async_trait]
impl ConsensusStore for LocalStore {
    async fn get(
        &self,
        discussion_id: &DiscussionId,
        task_id: TaskId,
    ) -> Result<Option<ConsensusAnnotation>, RepositoryError> {
        let key = (discussion_id.clone(), task_id);
        Ok(self.state.lock().await.consensus.get(&key).cloned())
    }

    async fn save(&self, consensus: ConsensusAnnotation) -> Result<(), RepositoryError> {
        self.mutate(|state| {
            state.consensus.insert(
                (consensus.discussion_id.clone(), consensus.task_id),
                consensus,
            );
            Ok(())
        })
        .await
    }

    async fn save_draft(&self, draft: ConsensusAnnotation) -> Result<bool, RepositoryError> {
        self.mutate(|state| {
            let key = (draft.discussion_id.clone(), draft.task_id);
            if state.consensus.get(&key).is_some_and(|c| !c.is_draft()) {
                return Ok(false);
            }
            state.consensus.insert(key, draft);
            Ok(true)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotation_domain::TaskStatus;

    fn discussion(id: &str) -> Discussion {
        Discussion::new(id, format!("Discussion {id}"), format!("https://example.com/{id}"), "acme/app")
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_lists_in_order() {
        let store = LocalStore::in_memory();
        let id = DiscussionId::new("d1");

        store
            .upsert(&id, TaskId::Task1, &UserId::new("bob"), AnnotationData::new().with("relevance", "Yes"))
            .await
            .unwrap();
        store
            .upsert(&id, TaskId::Task1, &UserId::new("alice"), AnnotationData::new().with("relevance", "No"))
            .await
            .unwrap();
        store
            .upsert(&id, TaskId::Task1, &UserId::new("bob"), AnnotationData::new().with("learning", "Yes"))
            .await
            .unwrap();

        let list = store.list_by_task(&id, TaskId::Task1).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].user_id.as_str(), "alice");
        // Replaced wholesale, no merge
        assert!(!list[1].data.contains_key("relevance"));
        assert!(store.list_by_task(&id, TaskId::Task2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_task_states_patches_only_given_tasks() {
        let store = LocalStore::in_memory();
        assert!(store.insert(discussion("d1")).await.unwrap());
        assert!(!store.insert(discussion("d1")).await.unwrap());

        let mut state = TaskState::new(TaskId::Task2, TaskStatus::Unlocked);
        state.annotator_count = 1;
        let updated = store
            .update_task_states(&DiscussionId::new("d1"), &[(TaskId::Task2, state)])
            .await
            .unwrap();

        assert_eq!(updated.task(TaskId::Task1).status, TaskStatus::Unlocked);
        assert_eq!(updated.task(TaskId::Task2).annotator_count, 1);

        let missing = store
            .update_task_states(&DiscussionId::new("nope"), &[])
            .await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_draft_never_replaces_reviewer_record() {
        let store = LocalStore::in_memory();
        let draft = ConsensusAnnotation::draft("d1", TaskId::Task1, AnnotationData::new(), true);
        assert!(store.save_draft(draft.clone()).await.unwrap());
        // Drafts refresh drafts
        assert!(store.save_draft(draft.clone()).await.unwrap());

        let reviewed = ConsensusAnnotation::reviewed("d1", TaskId::Task1, "lead", AnnotationData::new());
        store.save(reviewed).await.unwrap();
        assert!(!store.save_draft(draft).await.unwrap());

        let stored = ConsensusStore::get(&store, &DiscussionId::new("d1"), TaskId::Task1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id.as_str(), "lead");
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");

        {
            let store = LocalStore::open(&path).unwrap();
            store.insert(discussion("d1").with_language("Rust")).await.unwrap();
            store
                .upsert(
                    &DiscussionId::new("d1"),
                    TaskId::Task1,
                    &UserId::new("alice"),
                    AnnotationData::new().with("grounded", true),
                )
                .await
                .unwrap();
            store
                .save(ConsensusAnnotation::reviewed("d1", TaskId::Task1, "lead", AnnotationData::new()))
                .await
                .unwrap();
        }

        let reopened = LocalStore::open(&path).unwrap();
        let d = DiscussionRepository::get(&reopened, &DiscussionId::new("d1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(d.language.as_deref(), Some("Rust"));
        assert_eq!(
            reopened
                .list_by_task(&DiscussionId::new("d1"), TaskId::Task1)
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(
            ConsensusStore::get(&reopened, &DiscussionId::new("d1"), TaskId::Task1)
                .await
                .unwrap()
                .is_some()
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the snapshot file should be makes the rename fail
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), b"x").unwrap();

        let store = LocalStore {
            state: Mutex::new(StoreState::default()),
            path: Some(path),
        };
        assert!(store.insert(discussion("d1")).await.is_err());
        assert!(
            DiscussionRepository::get(&store, &DiscussionId::new("d1"))
                .await
                .unwrap()
                .is_none()
        );
    }

    fn submission(id: &str, user: &str, count: usize) -> Submission {
        let mut task_state = TaskState::new(TaskId::Task1, TaskStatus::Unlocked);
        task_state.annotator_count = count;
        Submission {
            discussion_id: DiscussionId::new(id),
            task_id: TaskId::Task1,
            user_id: UserId::new(user),
            data: AnnotationData::new().with("relevance", "Yes"),
            task_state,
        }
    }

    #[tokio::test]
    async fn test_commit_submission_writes_state_and_annotation() {
        let store = LocalStore::in_memory();
        store.insert(discussion("d1")).await.unwrap();

        let committed = store.commit_submission(submission("d1", "alice", 1)).await.unwrap();

        assert_eq!(committed.discussion.task(TaskId::Task1).annotator_count, 1);
        assert_eq!(committed.annotation.user_id.as_str(), "alice");
        assert_eq!(
            store
                .list_by_task(&DiscussionId::new("d1"), TaskId::Task1)
                .await
                .unwrap()
                .len(),
            1
        );

        let missing = store.commit_submission(submission("nope", "alice", 1)).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
        assert!(
            store
                .list_by_task(&DiscussionId::new("nope"), TaskId::Task1)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_failed_commit_persists_neither_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), b"x").unwrap();

        let mut state = StoreState::default();
        state
            .discussions
            .insert(DiscussionId::new("d1"), discussion("d1"));
        let store = LocalStore {
            state: Mutex::new(state),
            path: Some(path),
        };

        assert!(store.commit_submission(submission("d1", "alice", 1)).await.is_err());

        let d = DiscussionRepository::get(&store, &DiscussionId::new("d1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(d.task(TaskId::Task1).annotator_count, 0);
        assert!(
            store
                .list_by_task(&DiscussionId::new("d1"), TaskId::Task1)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_open_rejects_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(LocalStore::open(&path), Err(StoreError::Json { .. })));

        std::fs::write(&path, r#"{"version": 7}"#).unwrap();
        assert!(matches!(
            LocalStore::open(&path),
            Err(StoreError::UnsupportedVersion(7))
        ));
    }
}
