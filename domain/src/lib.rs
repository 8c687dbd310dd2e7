//! Domain layer for annotation-quorum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Discussions and tasks
//!
//! A [`Discussion`] is labelled in three sequential tasks. Each task has a
//! quota of independent annotators and a [`TaskStatus`] driven by the
//! [`lifecycle`] state machine.
//!
//! ## Consensus
//!
//! Once annotations arrive, the [`ConsensusAggregator`] reduces them field
//! by field into a single [`ConsensusAnnotation`] and an agreement signal
//! decided by an [`AgreementRule`].

pub mod annotation;
pub mod config;
pub mod consensus;
pub mod core;
pub mod discussion;
pub mod form;
pub mod lifecycle;

// Re-export commonly used types
pub use annotation::{
    Annotation, AnnotationData, Claim, ConsensusAnnotation, ConsensusOrigin, FieldValue,
    NOT_APPLICABLE, SupportingDoc, ValueKind,
};
pub use config::OutputFormat;
pub use consensus::{
    AgreementRule, AgreementStatus, ConsensusAggregator, ConsensusResult, FieldOutcome,
};
pub use core::{
    error::DomainError,
    ids::{DiscussionId, UserId},
    role::{Actor, Role},
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use discussion::{Discussion, DiscussionFilter, TaskId, TaskState, TaskStates, TaskStatus};
pub use form::{Form, FormKind, FormSet, TaskSchema, add_form, apply_cascade, duplicate_form};
pub use lifecycle::{Admission, AdmissionError, TaskEvent, Transition, Trigger, admit, apply_event};
