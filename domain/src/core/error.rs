//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Unknown task status: {0}")]
    UnknownStatus(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown field '{key}' for {task}")]
    UnknownField { task: String, key: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidFieldValue { key: String, reason: String },

    #[error("'{value}' is not an option of '{key}'")]
    InvalidOption { key: String, value: String },

    #[error("Invalid transition for {task}: {from} -> {to}")]
    InvalidTransition {
        task: String,
        from: String,
        to: String,
    },

    #[error("Star rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Form {0} does not exist")]
    UnknownForm(u32),

    #[error("No form number left after form {0}")]
    FormLimit(u32),
}

impl DomainError {
    /// Check if this error describes malformed annotation data
    pub fn is_invalid_data(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownField { .. }
                | DomainError::InvalidFieldValue { .. }
                | DomainError::InvalidOption { .. }
                | DomainError::UnknownForm(_)
                | DomainError::FormLimit(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let error = DomainError::InvalidTransition {
            task: "task1".to_string(),
            from: "locked".to_string(),
            to: "blocked".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid transition for task1: locked -> blocked"
        );
    }

    #[test]
    fn test_is_invalid_data() {
        assert!(
            DomainError::InvalidOption {
                key: "relevance".to_string(),
                value: "Maybe".to_string(),
            }
            .is_invalid_data()
        );
        assert!(!DomainError::InvalidRating(9).is_invalid_data());
        assert!(!DomainError::UnknownTask("task9".to_string()).is_invalid_data());
    }
}
