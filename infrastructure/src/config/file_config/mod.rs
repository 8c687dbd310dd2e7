//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod consensus;
mod identity;
mod logging;
mod output;
mod storage;

pub use consensus::FileConsensusConfig;
pub use identity::FileIdentityConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use storage::FileStorageConfig;

use annotation_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration that cannot be used at all
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{}", .0.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<ConfigIssue>),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agreement rule and draft behaviour
    pub consensus: FileConsensusConfig,
    /// Snapshot file location
    pub storage: FileStorageConfig,
    /// Audit trail and diagnostic log files
    pub logging: FileLoggingConfig,
    /// Default acting user
    pub identity: FileIdentityConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks the agreement rule, the identity role and a blank user name.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.consensus.parse_rule().1);
        issues.extend(self.identity.parse_role().1);
        issues.extend(self.identity.check_user());

        issues
    }

    /// Fail on error-level issues, returning the warnings otherwise
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotation_domain::{AgreementRule, OutputFormat, Role};
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[consensus]
rule = "unanimous"
auto_draft = false

[storage]
path = "data/store.json"

[logging]
audit_log = "audit.jsonl"

[identity]
user = "lead"
role = "pod_lead"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.consensus.parse_rule().0, AgreementRule::Unanimous);
        assert!(!config.consensus.auto_draft);
        assert_eq!(config.storage.path, Some(PathBuf::from("data/store.json")));
        assert_eq!(config.logging.audit_log, Some(PathBuf::from("audit.jsonl")));
        assert_eq!(config.identity.parse_role().0, Role::PodLead);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[identity]\nuser = \"alice\"\n").unwrap();
        assert_eq!(config.identity.user.as_deref(), Some("alice"));
        // Defaults should apply
        assert_eq!(config.consensus.rule, "majority");
        assert!(config.storage.path.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert!(config.check().unwrap().is_empty());
    }

    #[test]
    fn test_check_collects_errors() {
        let mut config = FileConfig::default();
        config.consensus.rule = "most".to_string();
        config.identity.role = "owner".to_string();

        assert_eq!(config.validate().len(), 2);
        let err = config.check().unwrap_err();
        assert!(err.to_string().contains("Unknown agreement rule"));
    }
}
