//! Application layer for annotation-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ConsensusConfig;
pub use ports::{
    annotation_repository::{AnnotationRepository, CommittedSubmission, Submission},
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    consensus_store::ConsensusStore,
    discussion_repository::DiscussionRepository,
    identity::IdentityProvider,
    import_progress::{ImportProgress, NoImportProgress},
    lifecycle_notifier::{LifecycleNotifier, NoLifecycleNotifier},
    repository::RepositoryError,
};
pub use use_cases::consensus::{
    ComputeConsensusUseCase, ConsensusError, SaveConsensusInput, SaveConsensusUseCase,
};
pub use use_cases::forms::{EditFormsUseCase, FormEdit, FormEditInput, FormEditOutcome, FormError};
pub use use_cases::import_discussions::{ImportDiscussionsUseCase, ImportError, ImportReport};
pub use use_cases::lifecycle_controller::{
    LifecycleError, SubmitInput, SubmitOutcome, TaskLifecycleController,
};
pub use use_cases::query_discussions::{
    DiscussionOverview, QueryDiscussionsUseCase, QueryError, TaskOverview,
};
pub use use_cases::task_locks::{TaskGuard, TaskLocks};
