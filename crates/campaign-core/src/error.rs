//! Core domain errors.

use thiserror::Error;

/// Core domain errors for Campaign Live.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A key component contains the key separator.
    #[error("Actor key {field} '{value}' contains the separator '{separator}'")]
    KeySeparator {
        field: &'static str,
        value: String,
        separator: char,
    },

    /// A key string did not have the expected shape.
    #[error("Malformed actor key '{0}'")]
    MalformedKey(String),

    /// Unknown faction label or army index.
    #[error("Unknown faction: {0}")]
    UnknownFaction(String),

    /// Unknown actor kind label.
    #[error("Unknown actor kind: {0}")]
    UnknownKind(String),
}

impl CoreError {
    /// Returns true if the error stems from a caller breaking an API contract,
    /// as opposed to bad external input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::KeySeparator { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_is_contract_violation() {
        let err = CoreError::KeySeparator {
            field: "short_name",
            value: "a|b".to_string(),
            separator: '|',
        };
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("short_name"));
    }

    #[test]
    fn test_parse_errors_are_not_contract_violations() {
        assert!(!CoreError::MalformedKey("x".into()).is_contract_violation());
        assert!(!CoreError::UnknownFaction("3".into()).is_contract_violation());
    }
}
