//! Logging configuration from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! audit_log = "~/.local/share/annotation-quorum/audit.jsonl"
//! file = "annotation-quorum.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL audit trail of committed changes
    pub audit_log: Option<PathBuf>,
    /// Diagnostic log file, in addition to stderr
    pub file: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Expand a leading `~/` to the home directory
    pub fn expand(path: &PathBuf) -> PathBuf {
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| path.clone()),
            Err(_) => path.clone(),
        }
    }

    pub fn audit_log_path(&self) -> Option<PathBuf> {
        self.audit_log.as_ref().map(Self::expand)
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_ref().map(Self::expand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let expanded = FileLoggingConfig::expand(&PathBuf::from("~/audit.jsonl"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("audit.jsonl"));
        }

        let plain = FileLoggingConfig::expand(&PathBuf::from("logs/audit.jsonl"));
        assert_eq!(plain, PathBuf::from("logs/audit.jsonl"));
    }
}
