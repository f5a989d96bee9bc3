// Configuration and usage errors
//
// Data that fails its rules is never an error here; it is reported through
// `Outcome` and `Verdict`. These are programmer mistakes in the setup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Validation object is required")]
    MissingData,

    #[error("Validation schema is required")]
    MissingSchema,

    #[error("Unknown validation rule: {0}")]
    UnknownRule(String),

    #[error("Invalid field name. No field {segment} in {path}")]
    InvalidPath { path: String, segment: String },

    #[error("Field path {0} does not end on a rule set")]
    NotALeaf(String),

    #[error("Invalid parameter for rule {rule}: {reason}")]
    InvalidParameter { rule: String, reason: String },

    #[error("Invalid schema at {at}: {reason}")]
    InvalidSchema { at: String, reason: String },

    #[error("Failed to load: {0}")]
    Load(String),

    #[error("Failed to parse: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigurationError {
    pub(crate) fn invalid_parameter(rule: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_schema(at: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            at: if at.is_empty() { "<root>".to_string() } else { at.to_string() },
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_message() {
        let err = ConfigurationError::InvalidPath {
            path: "user.nick".to_string(),
            segment: "nick".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid field name. No field nick in user.nick");
    }

    #[test]
    fn test_root_location_is_named() {
        let err = ConfigurationError::invalid_schema("", "expected an object");
        assert_eq!(err.to_string(), "Invalid schema at <root>: expected an object");
    }
}
