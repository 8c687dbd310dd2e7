//! Infrastructure layer for annotation-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the local JSON store, audit logging,
//! the static identity provider and configuration file loading.

pub mod config;
pub mod identity;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileConsensusConfig, FileIdentityConfig,
    FileLoggingConfig, FileOutputConfig, FileStorageConfig,
};
pub use identity::StaticIdentityProvider;
pub use logging::JsonlAuditLogger;
pub use store::{LocalStore, StoreError, read_discussions};
