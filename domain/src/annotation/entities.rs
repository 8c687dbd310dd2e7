//! Annotation entities

use super::data::AnnotationData;
use crate::core::error::DomainError;
use crate::core::ids::{DiscussionId, UserId};
use crate::discussion::task::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One annotator's independent submission for one task of a discussion.
///
/// There is at most one annotation per `(discussion_id, task_id, user_id)`;
/// resubmitting replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub discussion_id: DiscussionId,
    pub task_id: TaskId,
    pub user_id: UserId,
    pub data: AnnotationData,
    /// Submission time; refreshed on every resubmission
    pub timestamp: DateTime<Utc>,
}

impl Annotation {
    pub fn new(
        discussion_id: impl Into<DiscussionId>,
        task_id: TaskId,
        user_id: impl Into<UserId>,
        data: AnnotationData,
    ) -> Self {
        Self {
            discussion_id: discussion_id.into(),
            task_id,
            user_id: user_id.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// How a consensus record came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusOrigin {
    /// Produced by the aggregator when the annotator quota was reached
    Draft,
    /// Composed or confirmed by a pod lead or admin
    #[default]
    Reviewer,
}

impl ConsensusOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusOrigin::Draft => "draft",
            ConsensusOrigin::Reviewer => "reviewer",
        }
    }
}

/// The single agreed record for one task of a discussion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusAnnotation {
    pub discussion_id: DiscussionId,
    pub task_id: TaskId,
    /// The reviewer who saved it, or [`UserId::system`] for drafts
    pub user_id: UserId,
    pub data: AnnotationData,
    /// Overall star rating (1–5)
    #[serde(default)]
    pub stars: Option<u8>,
    /// Overall free-text comment
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub origin: ConsensusOrigin,
    /// Agreement signal of the aggregation this record was derived from
    #[serde(default)]
    pub agreement: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

impl ConsensusAnnotation {
    /// Create a draft authored by the system
    pub fn draft(
        discussion_id: impl Into<DiscussionId>,
        task_id: TaskId,
        data: AnnotationData,
        agreement: bool,
    ) -> Self {
        Self {
            discussion_id: discussion_id.into(),
            task_id,
            user_id: UserId::system(),
            data,
            stars: None,
            comment: None,
            origin: ConsensusOrigin::Draft,
            agreement: Some(agreement),
            timestamp: Utc::now(),
        }
    }

    /// Create a reviewer-authored record
    pub fn reviewed(
        discussion_id: impl Into<DiscussionId>,
        task_id: TaskId,
        user_id: impl Into<UserId>,
        data: AnnotationData,
    ) -> Self {
        Self {
            discussion_id: discussion_id.into(),
            task_id,
            user_id: user_id.into(),
            data,
            stars: None,
            comment: None,
            origin: ConsensusOrigin::Reviewer,
            agreement: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a star rating, rejecting values outside 1–5
    pub fn with_stars(mut self, stars: Option<u8>) -> Result<Self, DomainError> {
        if let Some(value) = stars {
            validate_stars(value)?;
        }
        self.stars = stars;
        Ok(self)
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_agreement(mut self, agreement: Option<bool>) -> Self {
        self.agreement = agreement;
        self
    }

    pub fn is_draft(&self) -> bool {
        self.origin == ConsensusOrigin::Draft
    }
}

/// Check a star rating is within 1–5
pub fn validate_stars(stars: u8) -> Result<(), DomainError> {
    if (1..=5).contains(&stars) {
        Ok(())
    } else {
        Err(DomainError::InvalidRating(stars))
    }
}
