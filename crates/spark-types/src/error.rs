use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A diagnostic produced while compiling one formula.
///
/// Carries the first failure encountered in a pass and its byte position
/// within the original text. Later failures in the same pass never
/// overwrite an already-recorded diagnostic.
///
/// Editor frontends render these — the JSON shape is part of the
/// diagnostics contract.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (at {position})")]
pub struct ExprError {
    /// Human-readable error message.
    pub message: String,
    /// Byte offset of the failure within the original formula text.
    pub position: usize,
}

impl ExprError {
    /// Create a new diagnostic.
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_error_display() {
        let err = ExprError::new("unknown function 'Foo'", 12);
        assert_eq!(format!("{err}"), "unknown function 'Foo' (at 12)");
    }

    #[test]
    fn test_expr_error_json_round_trip() {
        let err = ExprError::new("unexpected character '#'", 3);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"message\""));
        assert!(json.contains("\"position\":3"));
        let back: ExprError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_expr_error_serialization_determinism() {
        let first = serde_json::to_string(&ExprError::new("bad token", 7)).unwrap();
        for i in 0..100 {
            let json = serde_json::to_string(&ExprError::new("bad token", 7)).unwrap();
            assert_eq!(first, json, "Determinism failure at iteration {i}");
        }
    }
}
