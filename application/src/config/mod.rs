//! Application-level configuration.
//!
//! - [`ConsensusConfig`] - agreement rule and automatic draft control

pub mod consensus_config;

pub use consensus_config::ConsensusConfig;
