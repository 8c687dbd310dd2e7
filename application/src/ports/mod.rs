//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod annotation_repository;
pub mod audit_logger;
pub mod consensus_store;
pub mod discussion_repository;
pub mod identity;
pub mod import_progress;
pub mod lifecycle_notifier;
pub mod repository;
