//! Spark expression code generator: compiles parsed event-sheet
//! formulas into JavaScript fragments for the Spark runtime.
//!
//! # Architecture
//!
//! [`compile`] parses one formula under a [`Grammar`] and walks the
//! resulting node list with an [`ExprCompiler`], which owns an
//! append-only output buffer. Code shaping is metadata-driven: every
//! call consults the [`MetadataRegistry`] for its descriptor, and all
//! target-specific synthesis — object-name expansion, accessor calls,
//! literal escaping, include bookkeeping — is delegated to a
//! [`PlatformWriter`]. Nested sub-expressions recurse into fresh
//! compiler/parser pairs sharing the same writer and
//! [`CompilationContext`].
//!
//! The caller splices the returned fragment into a larger generated
//! statement and reads the accumulated side-channel requirements
//! (required object lists, includes) from the context and writer.
//!
//! [`Grammar`]: spark_types::Grammar
//! [`MetadataRegistry`]: spark_metadata::MetadataRegistry
//! [`PlatformWriter`]: spark_metadata::PlatformWriter
//! [`CompilationContext`]: spark_types::CompilationContext

mod compiler;
mod error;
mod js;

pub use compiler::{compile, ExprCompiler, MAX_SUBEXPRESSION_DEPTH};
pub use error::{CodegenError, CodegenResult};
pub use js::JsWriter;
