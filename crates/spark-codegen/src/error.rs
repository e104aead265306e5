//! Codegen error types.

use spark_types::ExprError;
use thiserror::Error;

/// Errors that can occur while compiling one formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// The formula (or a nested sub-expression) failed to parse. The
    /// message and byte position are the first failure encountered,
    /// forwarded unchanged from however deep it occurred.
    #[error("{message} (at {position})")]
    Parse { message: String, position: usize },

    /// Sub-expression nesting exceeded
    /// [`MAX_SUBEXPRESSION_DEPTH`](crate::MAX_SUBEXPRESSION_DEPTH).
    #[error("expression nesting exceeds {} levels", crate::MAX_SUBEXPRESSION_DEPTH)]
    DepthLimit,

    /// A call node names a function with no registered descriptor.
    /// Unreachable through [`compile`](crate::compile) (the parser
    /// validates names), but hand-built ASTs can trigger it.
    #[error("no metadata registered for function '{0}'")]
    UnknownFunction(String),
}

impl CodegenError {
    /// The positioned diagnostic for editor frontends, when one exists.
    pub fn diagnostic(&self) -> Option<ExprError> {
        match self {
            CodegenError::Parse { message, position } => {
                Some(ExprError::new(message.clone(), *position))
            }
            _ => None,
        }
    }
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
