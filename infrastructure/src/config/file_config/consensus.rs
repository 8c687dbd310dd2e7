//! Consensus configuration from TOML (`[consensus]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [consensus]
//! rule = "majority"     # or "unanimous", "atleast:2", "75%"
//! auto_draft = true     # store the aggregated draft when quota is reached
//! ```

use annotation_application::ConsensusConfig;
use annotation_domain::{AgreementRule, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Consensus configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Agreement rule: "majority", "unanimous", "atleast:N", "N%"
    pub rule: String,
    /// Store a draft consensus when a task reaches its quota
    pub auto_draft: bool,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            rule: "majority".to_string(),
            auto_draft: true,
        }
    }
}

impl FileConsensusConfig {
    /// Parse the rule string, falling back to the default rule
    pub fn parse_rule(&self) -> (AgreementRule, Option<ConfigIssue>) {
        match self.rule.parse::<AgreementRule>() {
            Ok(rule) => (rule, None),
            Err(e) => (
                AgreementRule::default(),
                Some(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "consensus.rule".to_string(),
                        value: self.rule.clone(),
                    },
                    e,
                )),
            ),
        }
    }

    pub fn to_consensus_config(&self) -> ConsensusConfig {
        ConsensusConfig::default()
            .with_rule(self.parse_rule().0)
            .with_auto_draft(self.auto_draft)
    }
}
