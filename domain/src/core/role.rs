//! Caller roles and the acting identity.

use super::error::DomainError;
use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// Role of the caller, as reported by the identity provider.
///
/// Pod leads and admins are *reviewers*: they may exceed the annotator
/// quota, change task status and author consensus records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Annotator,
    PodLead,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Annotator => "annotator",
            Role::PodLead => "pod_lead",
            Role::Admin => "admin",
        }
    }

    /// Whether this role may perform reviewer-only actions
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Role::PodLead | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "annotator" => Ok(Role::Annotator),
            "pod_lead" | "podlead" | "reviewer" => Ok(Role::PodLead),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn annotator(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Annotator)
    }

    pub fn pod_lead(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::PodLead)
    }

    pub fn is_reviewer(&self) -> bool {
        self.role.is_reviewer()
    }
}
