//! AST node types for parsed event-sheet formulas.
//!
//! The parser turns one formula string into a flat, left-to-right list of
//! [`ExprNode`]s: literal/operator text flows through as constants, calls
//! become tagged call nodes, and parenthesized groups become
//! sub-expressions that are re-parsed during code generation. Every node
//! carries a [`Span`] into the original text.

use crate::Span;
use std::fmt;

/// Which grammar a formula is parsed and compiled under.
///
/// The grammar decides which registry tables calls resolve against and
/// the neutral literal emitted when an object expansion is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// Numeric formulas: `2 + Hero.X()`.
    Number,
    /// String formulas: `"score: " + ToString(score)`.
    Text,
}

impl Grammar {
    /// The default value emitted when a construct produces nothing, e.g.
    /// an object name that expands to zero concrete instances.
    pub fn neutral_literal(self) -> &'static str {
        match self {
            Grammar::Number => "0",
            Grammar::Text => "\"\"",
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Number => write!(f, "number"),
            Grammar::Text => write!(f, "string"),
        }
    }
}

/// One argument to a call: the raw text of the slot, before any
/// interpretation.
///
/// Arguments declared as nested expressions are re-parsed during code
/// generation; object names, operators and other platform-level kinds are
/// handed to the platform writer as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    text: String,
}

impl Expression {
    /// Create an expression from its raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw text of the argument.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the argument holds no non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Expression::new(text)
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Expression::new(text)
    }
}

/// A complete parsed formula: nodes in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExpression {
    pub nodes: Vec<ExprNode>,
}

/// A single construct recognised in the formula.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprNodeKind,
    pub span: Span,
}

impl ExprNode {
    pub fn new(kind: ExprNodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of construct.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNodeKind {
    /// Literal or operator text emitted verbatim: `2`, `+`, `3.5`.
    Constant(String),
    /// `Name(args...)` — a free function call.
    ///
    /// An empty `name` under the string grammar denotes a bare string
    /// literal, with the literal text as the single parameter.
    StaticCall {
        name: String,
        params: Vec<Expression>,
    },
    /// `Object.Name(args...)` — slot 0 of `params` is the symbolic
    /// object name.
    ObjectCall {
        name: String,
        params: Vec<Expression>,
    },
    /// `Object.Behavior::Name(args...)` — slots 0 and 1 of `params` are
    /// the symbolic object name and the behavior name.
    BehaviorCall {
        name: String,
        params: Vec<Expression>,
    },
    /// `( ... )` — a nested group, re-parsed under the enclosing grammar
    /// with its own output buffer and error state.
    SubExpr { expression: Expression },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_literals() {
        assert_eq!(Grammar::Number.neutral_literal(), "0");
        assert_eq!(Grammar::Text.neutral_literal(), "\"\"");
    }

    #[test]
    fn test_grammar_display() {
        assert_eq!(format!("{}", Grammar::Number), "number");
        assert_eq!(format!("{}", Grammar::Text), "string");
    }

    #[test]
    fn test_expression_blank() {
        assert!(Expression::new("").is_blank());
        assert!(Expression::new("   ").is_blank());
        assert!(!Expression::new(" 0 ").is_blank());
    }

    #[test]
    fn test_expression_from_str() {
        let e: Expression = "Hero".into();
        assert_eq!(e.text(), "Hero");
    }
}
