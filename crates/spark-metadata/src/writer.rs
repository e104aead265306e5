//! The contract between the expression compiler and a target platform.

use spark_types::{CompilationContext, Expression};

use crate::descriptor::{BehaviorDescriptor, ObjectDescriptor, ParameterSpec};
use crate::scope::Scope;

/// Target-specific code synthesis primitives.
///
/// The compiler owns the metadata-driven shaping of calls; everything
/// that depends on the target runtime — name mangling, object-name
/// expansion, accessor synthesis, literal escaping, include bookkeeping —
/// is delegated through this trait. Implementations accumulate state
/// (registered includes) across one generation pass.
pub trait PlatformWriter {
    /// Register an include artifact. Duplicate registration has no
    /// effect.
    fn add_include(&mut self, file: &str);

    /// Turn raw text into a string literal of the target language,
    /// escaped and quoted.
    fn string_literal(&self, raw: &str) -> String;

    /// Wrap already-emitted code in the platform's locale-to-UTF-8
    /// conversion call.
    fn locale_to_utf8(&self, code: String) -> String;

    /// Expand a symbolic object name into the ordered list of concrete
    /// object instances it denotes in `scope`. A group expands to its
    /// members, a declared object to itself, an unknown name to nothing.
    fn expand_object_name(&self, name: &str, scope: &Scope) -> Vec<String>;

    /// Synthesise code for a parameter of a platform-level kind
    /// (object, behavior, operator, identifier, variable). Nested
    /// expression kinds never reach this method; the compiler recurses
    /// on those itself.
    fn parameter_code(
        &mut self,
        expr: &Expression,
        spec: &ParameterSpec,
        scope: &Scope,
        ctx: &mut CompilationContext,
    ) -> String;

    /// Synthesise one step of the object fold: a call on `instance`
    /// falling back to `previous` when the instance list is empty.
    fn object_accessor_call(
        &mut self,
        instance: &str,
        object: &ObjectDescriptor,
        call_name: &str,
        params: &str,
        previous: &str,
        ctx: &mut CompilationContext,
    ) -> String;

    /// Synthesise one step of the behavior fold: a call on the named
    /// behavior of `instance`, falling back to `previous`.
    #[allow(clippy::too_many_arguments)]
    fn behavior_accessor_call(
        &mut self,
        instance: &str,
        behavior_name: &str,
        behavior: &BehaviorDescriptor,
        call_name: &str,
        params: &str,
        previous: &str,
        ctx: &mut CompilationContext,
    ) -> String;
}
