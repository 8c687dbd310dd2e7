//! Configuration file loading for annotation-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./annotation.toml` or `./.annotation.toml`
//! 3. Global config: `$XDG_CONFIG_HOME/annotation-quorum/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileConsensusConfig, FileIdentityConfig, FileLoggingConfig,
    FileOutputConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
