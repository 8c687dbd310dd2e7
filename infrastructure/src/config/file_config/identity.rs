//! Identity configuration from TOML (`[identity]` section)
//!
//! ```toml
//! [identity]
//! user = "alice"
//! role = "pod_lead"   # annotator | pod_lead | admin
//! ```

use annotation_domain::{ConfigIssue, ConfigIssueCode, Role};
use serde::{Deserialize, Serialize};

/// Who the CLI acts as when `--user` / `--role` are not given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIdentityConfig {
    pub user: Option<String>,
    pub role: String,
}

impl Default for FileIdentityConfig {
    fn default() -> Self {
        Self {
            user: None,
            role: Role::Annotator.as_str().to_string(),
        }
    }
}

impl FileIdentityConfig {
    pub fn parse_role(&self) -> (Role, Option<ConfigIssue>) {
        match self.role.parse::<Role>() {
            Ok(role) => (role, None),
            Err(e) => (
                Role::default(),
                Some(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "identity.role".to_string(),
                        value: self.role.clone(),
                    },
                    e.to_string(),
                )),
            ),
        }
    }

    /// Blank user names are reported; a missing one is fine
    pub fn check_user(&self) -> Option<ConfigIssue> {
        match &self.user {
            Some(user) if user.trim().is_empty() => Some(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "identity.user".to_string(),
                },
                "identity.user cannot be empty",
            )),
            _ => None,
        }
    }
}
