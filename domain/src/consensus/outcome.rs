//! Aggregation results.

use crate::annotation::data::AnnotationData;
use crate::annotation::entities::ConsensusAnnotation;
use crate::annotation::value::FieldValue;
use crate::core::ids::{DiscussionId, UserId};
use crate::discussion::task::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Task-level agreement signal written into the `consensus` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgreementStatus {
    Agreement,
    NoAgreement,
}

impl AgreementStatus {
    pub fn from_bool(agreement: bool) -> Self {
        if agreement {
            AgreementStatus::Agreement
        } else {
            AgreementStatus::NoAgreement
        }
    }

    pub fn is_agreement(&self) -> bool {
        matches!(self, AgreementStatus::Agreement)
    }

    /// Label stored in consensus data
    pub fn label(&self) -> &'static str {
        match self {
            AgreementStatus::Agreement => "Agreement",
            AgreementStatus::NoAgreement => "No Agreement",
        }
    }
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How one field of the consensus was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FieldOutcome {
    /// One value had the strictly highest count
    Resolved {
        value: FieldValue,
        votes: usize,
        voters: usize,
        /// Whether `votes` satisfied the agreement rule
        agreed: bool,
    },
    /// Several values shared the highest count; the earliest was kept
    Tied {
        value: FieldValue,
        votes: usize,
        voters: usize,
        contenders: Vec<String>,
    },
    /// Every value was chosen once; the field is left unresolved
    NoAgreement { voters: usize, values: Vec<String> },
    /// Claims concatenated or documents unioned
    Merged { entries: usize, contributors: usize },
    /// First non-empty text in submission order
    FirstText { author: UserId },
}

impl FieldOutcome {
    /// Whether this field was decided by voting
    pub fn is_voted(&self) -> bool {
        matches!(
            self,
            FieldOutcome::Resolved { .. } | FieldOutcome::Tied { .. } | FieldOutcome::NoAgreement { .. }
        )
    }

    /// Whether this field counts toward task-level agreement.
    /// Non-voted fields never break agreement.
    pub fn agreed(&self) -> bool {
        match self {
            FieldOutcome::Resolved { agreed, .. } => *agreed,
            FieldOutcome::Tied { .. } | FieldOutcome::NoAgreement { .. } => false,
            FieldOutcome::Merged { .. } | FieldOutcome::FirstText { .. } => true,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            FieldOutcome::Resolved {
                value,
                votes,
                voters,
                agreed,
            } => format!(
                "{} ({}/{}{})",
                value.display(),
                votes,
                voters,
                if *agreed { "" } else { ", below rule" }
            ),
            FieldOutcome::Tied {
                value,
                votes,
                contenders,
                ..
            } => format!(
                "{} (tie at {} between {})",
                value.display(),
                votes,
                contenders.join(", ")
            ),
            FieldOutcome::NoAgreement { values, .. } => {
                format!("unresolved ({})", values.join(", "))
            }
            FieldOutcome::Merged {
                entries,
                contributors,
            } => format!("{} merged from {} annotator(s)", entries, contributors),
            FieldOutcome::FirstText { author } => format!("text from {}", author),
        }
    }
}

/// Output of the aggregator for one task of one discussion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Consensus data, including the `consensus` agreement label
    pub data: AnnotationData,
    /// Task-level agreement
    pub agreement: bool,
    /// Number of annotations aggregated
    pub annotators: usize,
    /// Per-field provenance
    pub fields: BTreeMap<String, FieldOutcome>,
}

impl ConsensusResult {
    pub fn status(&self) -> AgreementStatus {
        AgreementStatus::from_bool(self.agreement)
    }

    /// Voted fields that did not reach agreement
    pub fn disagreements(&self) -> impl Iterator<Item = (&String, &FieldOutcome)> {
        self.fields
            .iter()
            .filter(|(_, outcome)| outcome.is_voted() && !outcome.agreed())
    }

    /// Fields left without a value because every answer differed
    pub fn unresolved(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, outcome)| matches!(outcome, FieldOutcome::NoAgreement { .. }))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Turn the result into a system-authored draft
    pub fn into_draft(self, discussion_id: impl Into<DiscussionId>, task_id: TaskId) -> ConsensusAnnotation {
        ConsensusAnnotation::draft(discussion_id, task_id, self.data, self.agreement)
    }
}
