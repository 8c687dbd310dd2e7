//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where discussions, annotations and consensus records are kept.
///
/// Without a path the store lives in memory for the duration of the process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// JSON snapshot file
    pub path: Option<PathBuf>,
}
