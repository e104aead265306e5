//! Descriptor types for functions, objects and behaviors.

use std::fmt;
use std::sync::Arc;

use spark_types::{CompilationContext, Expression, Grammar};

use crate::writer::PlatformWriter;

/// A full-override code generator attached to a descriptor.
///
/// When present it fully determines the emitted code for its construct;
/// no parameter synthesis, call shaping or UTF-8 wrapping applies.
pub type OverrideFn = Arc<
    dyn Fn(&[Expression], &mut dyn PlatformWriter, &mut CompilationContext) -> String
        + Send
        + Sync,
>;

// ─────────────────────────────────────────────────────────────────────
// Function descriptors
// ─────────────────────────────────────────────────────────────────────

/// How code is produced for a function — a closed union, so the
/// override-wins rule holds by construction rather than by flag checks.
#[derive(Clone)]
pub enum FunctionCodeGen {
    /// The standard shaping path: `call_name(p1, p2, ...)`.
    Standard {
        /// The emitted call name, e.g. `sparkrt.vars.getNumber`.
        call_name: String,
        /// `true` if the emitted value is already UTF-8 encoded; when
        /// `false` a string-returning call is wrapped in the platform's
        /// locale-to-UTF-8 conversion.
        utf8: bool,
        /// Declared parameter specs, in declaration order.
        parameters: Vec<ParameterSpec>,
    },
    /// A full-override generator. Everything except the include artifact
    /// is determined by the generator.
    Override(OverrideFn),
}

impl fmt::Debug for FunctionCodeGen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionCodeGen::Standard {
                call_name,
                utf8,
                parameters,
            } => f
                .debug_struct("Standard")
                .field("call_name", call_name)
                .field("utf8", utf8)
                .field("parameters", parameters)
                .finish(),
            FunctionCodeGen::Override(_) => f.write_str("Override(..)"),
        }
    }
}

/// Metadata describing one expression function.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    /// Include artifact to register with the platform writer whenever the
    /// function is compiled. Registration is idempotent.
    pub include_file: Option<String>,
    /// Declared return type: [`Grammar::Number`] or [`Grammar::Text`].
    pub return_type: Grammar,
    /// Standard call shaping or a full override.
    pub codegen: FunctionCodeGen,
}

impl FunctionDescriptor {
    /// A number-returning function with the given emitted call name.
    pub fn number(call_name: impl Into<String>) -> Self {
        Self::standard(Grammar::Number, call_name)
    }

    /// A string-returning function with the given emitted call name.
    pub fn string(call_name: impl Into<String>) -> Self {
        Self::standard(Grammar::Text, call_name)
    }

    fn standard(return_type: Grammar, call_name: impl Into<String>) -> Self {
        Self {
            include_file: None,
            return_type,
            codegen: FunctionCodeGen::Standard {
                call_name: call_name.into(),
                utf8: false,
                parameters: Vec::new(),
            },
        }
    }

    /// A function whose code is produced entirely by `generator`.
    pub fn with_override(return_type: Grammar, generator: OverrideFn) -> Self {
        Self {
            include_file: None,
            return_type,
            codegen: FunctionCodeGen::Override(generator),
        }
    }

    /// Attach the include artifact.
    pub fn with_include(mut self, file: impl Into<String>) -> Self {
        self.include_file = Some(file.into());
        self
    }

    /// Append a declared parameter. No effect on override descriptors,
    /// whose generator alone decides how parameters are used.
    pub fn with_parameter(mut self, kind: ParameterKind) -> Self {
        if let FunctionCodeGen::Standard { parameters, .. } = &mut self.codegen {
            parameters.push(ParameterSpec { kind });
        }
        self
    }

    /// Mark the emitted value as already UTF-8 encoded.
    pub fn utf8(mut self) -> Self {
        if let FunctionCodeGen::Standard { utf8, .. } = &mut self.codegen {
            *utf8 = true;
        }
        self
    }

    /// Number of declared parameters (zero for overrides).
    pub fn parameter_count(&self) -> usize {
        match &self.codegen {
            FunctionCodeGen::Standard { parameters, .. } => parameters.len(),
            FunctionCodeGen::Override(_) => 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────

/// A declared parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub kind: ParameterKind,
}

/// What a parameter slot holds, which decides how its code is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// A nested numeric formula, compiled recursively.
    Expression,
    /// A nested string formula, compiled recursively.
    StringExpression,
    /// A symbolic object name, synthesised by the platform writer.
    Object,
    /// A behavior name attached to the preceding object slot.
    Behavior,
    /// An operator token (`=`, `+`, ...), passed through by the writer.
    Operator,
    /// A plain identifier (layer name, animation name, ...).
    Identifier,
    /// A variable path, synthesised into a variable accessor.
    Variable,
}

// ─────────────────────────────────────────────────────────────────────
// Object & behavior descriptors
// ─────────────────────────────────────────────────────────────────────

/// Metadata for a concrete object type, looked up by type name.
///
/// An instance whose type has no registered descriptor compiles against
/// the default (no includes) — an unresolved type is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectDescriptor {
    /// Include artifacts required by any accessor call on this type.
    pub include_files: Vec<String>,
}

impl ObjectDescriptor {
    pub fn new(include_files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            include_files: include_files.into_iter().map(Into::into).collect(),
        }
    }
}

/// Metadata for a behavior type, looked up by behavior type name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BehaviorDescriptor {
    /// Include artifacts required by any accessor call on this behavior.
    pub include_files: Vec<String>,
}

impl BehaviorDescriptor {
    pub fn new(include_files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            include_files: include_files.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let desc = FunctionDescriptor::number("sparkrt.math.clamp")
            .with_include("math.js")
            .with_parameter(ParameterKind::Expression)
            .with_parameter(ParameterKind::Expression)
            .with_parameter(ParameterKind::Expression);
        assert_eq!(desc.include_file.as_deref(), Some("math.js"));
        assert_eq!(desc.return_type, Grammar::Number);
        assert_eq!(desc.parameter_count(), 3);
    }

    #[test]
    fn test_utf8_flag() {
        let desc = FunctionDescriptor::string("sparkrt.str.toString").utf8();
        match &desc.codegen {
            FunctionCodeGen::Standard { utf8, .. } => assert!(utf8),
            FunctionCodeGen::Override(_) => panic!("expected standard codegen"),
        }
    }

    #[test]
    fn test_override_ignores_parameter_builder() {
        let desc = FunctionDescriptor::with_override(
            Grammar::Text,
            Arc::new(|_, _, _| "\"\\n\"".to_string()),
        )
        .with_parameter(ParameterKind::Expression)
        .utf8();
        assert!(matches!(desc.codegen, FunctionCodeGen::Override(_)));
        assert_eq!(desc.parameter_count(), 0);
    }
}
