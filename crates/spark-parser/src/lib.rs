//! Spark formula parser: one formula string to a [`ParsedExpression`].
//!
//! The parser scans a formula left to right under either the numeric or
//! the string grammar, validating call names and arity against the
//! metadata registry as constructs are recognised. It fails fast: the
//! first error aborts the parse and carries the byte position of the
//! failure.
//!
//! [`ParsedExpression`]: spark_types::ParsedExpression

mod error;
mod parser;

pub use error::ParseError;
pub use parser::{parse, Parser};
