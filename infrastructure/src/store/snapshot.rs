//! On-disk snapshot format.
//!
//! ```json
//! { "version": 1, "discussions": [...], "annotations": [...], "consensus": [...] }
//! ```

use super::error::StoreError;
use annotation_domain::{
    Annotation, ConsensusAnnotation, Discussion, DiscussionId, TaskId, UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub(crate) const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    #[serde(default)]
    discussions: Vec<Discussion>,
    #[serde(default)]
    annotations: Vec<Annotation>,
    #[serde(default)]
    consensus: Vec<ConsensusAnnotation>,
}

/// In-memory state of a store, keyed for direct lookups
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    pub discussions: BTreeMap<DiscussionId, Discussion>,
    pub annotations: BTreeMap<(DiscussionId, TaskId, UserId), Annotation>,
    pub consensus: BTreeMap<(DiscussionId, TaskId), ConsensusAnnotation>,
}

impl StoreState {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let bytes = std::fs::read(path).map_err(|e| StoreError::io(path, e))?;
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::json(path, e))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion(snapshot.version));
        }

        Ok(Self {
            discussions: snapshot
                .discussions
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
            annotations: snapshot
                .annotations
                .into_iter()
                .map(|a| ((a.discussion_id.clone(), a.task_id, a.user_id.clone()), a))
                .collect(),
            consensus: snapshot
                .consensus
                .into_iter()
                .map(|c| ((c.discussion_id.clone(), c.task_id), c))
                .collect(),
        })
    }

    pub fn to_json(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            discussions: self.discussions.values().cloned().collect(),
            annotations: self.annotations.values().cloned().collect(),
            consensus: self.consensus.values().cloned().collect(),
        };
        serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::json(path, e))
    }
}
