//! Shared types for the Spark expression compiler.
//!
//! This crate defines the expression AST, source spans, the diagnostic
//! error type, and the per-compilation context shared across all
//! compiler stages.

mod context;
mod error;
mod span;
pub mod ast;

pub use ast::{Expression, ExprNode, ExprNodeKind, Grammar, ParsedExpression};
pub use context::CompilationContext;
pub use error::ExprError;
pub use span::Span;
