//! Import discussions use case
//!
//! Adds new discussions to the repository. Existing ids are left untouched
//! and reported as skipped.

use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::discussion_repository::DiscussionRepository;
use crate::ports::import_progress::{ImportProgress, NoImportProgress};
use crate::ports::repository::RepositoryError;
use annotation_domain::{Discussion, DiscussionId, TaskId};
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Discussion at position {index} has an empty {field}")]
    InvalidDiscussion { index: usize, field: &'static str },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of an import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub imported: Vec<DiscussionId>,
    /// Ids that already existed (or repeated within the batch)
    pub skipped: Vec<DiscussionId>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.imported.len() + self.skipped.len()
    }
}

/// Use case for ingesting discussions
pub struct ImportDiscussionsUseCase {
    discussions: Arc<dyn DiscussionRepository>,
    audit: Arc<dyn AuditLogger>,
}

impl ImportDiscussionsUseCase {
    pub fn new(discussions: Arc<dyn DiscussionRepository>) -> Self {
        Self {
            discussions,
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, discussions: Vec<Discussion>) -> Result<ImportReport, ImportError> {
        self.execute_with_progress(discussions, &NoImportProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// The whole batch is checked before anything is inserted.
    pub async fn execute_with_progress(
        &self,
        discussions: Vec<Discussion>,
        progress: &dyn ImportProgress,
    ) -> Result<ImportReport, ImportError> {
        for (index, discussion) in discussions.iter().enumerate() {
            if discussion.id.as_str().trim().is_empty() {
                return Err(ImportError::InvalidDiscussion { index, field: "id" });
            }
            if discussion.title.trim().is_empty() {
                return Err(ImportError::InvalidDiscussion {
                    index,
                    field: "title",
                });
            }
        }

        progress.on_start(discussions.len());
        let mut report = ImportReport::default();
        let mut seen = HashSet::new();

        for discussion in discussions {
            let id = discussion.id.clone();
            let inserted = seen.insert(id.clone())
                && self.discussions.insert(Self::normalize(discussion)).await?;

            progress.on_discussion(id.as_str(), inserted);
            if inserted {
                report.imported.push(id);
            } else {
                warn!("Skipping existing discussion {}", id);
                report.skipped.push(id);
            }
        }

        progress.on_finish(report.imported.len(), report.skipped.len());
        info!(
            "Imported {} discussion(s), skipped {}",
            report.imported.len(),
            report.skipped.len()
        );
        self.audit.log(AuditEvent::new(
            "discussions_imported",
            json!({
                "imported": report.imported,
                "skipped": report.skipped,
            }),
        ));

        Ok(report)
    }

    /// Quotas are fixed per task kind whatever the input says
    fn normalize(mut discussion: Discussion) -> Discussion {
        for task in TaskId::ALL {
            discussion.task_mut(task).required_annotators = task.required_annotators();
        }
        discussion
    }
}
