//! Declarative metadata read by the Spark expression compiler.
//!
//! Descriptors are built once during engine startup and are read-only for
//! the lifetime of the process. The [`MetadataRegistry`] maps function
//! names to [`FunctionDescriptor`]s (split by grammar, since the numeric
//! and string formula namespaces are independent) and concrete
//! object/behavior type names to their descriptors. [`Scope`] resolves
//! the symbolic names a user types against one game screen, and
//! [`PlatformWriter`] is the contract with the target-platform code
//! generator.

pub mod builtins;
mod descriptor;
mod registry;
mod scope;
mod writer;

pub use descriptor::{
    BehaviorDescriptor, FunctionCodeGen, FunctionDescriptor, ObjectDescriptor, OverrideFn,
    ParameterKind, ParameterSpec,
};
pub use registry::MetadataRegistry;
pub use scope::Scope;
pub use writer::PlatformWriter;
