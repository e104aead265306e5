//! The expression compiler.
//!
//! A recursive walk over the parsed node list. Constants flow through
//! verbatim; calls are shaped from their descriptors; object and
//! behavior calls fan out over the concrete instances their symbolic
//! object name denotes and fold the per-instance accessor calls into a
//! single expression; parenthesized groups and expression-kind
//! parameters compile through a fresh compiler sharing the same writer
//! and context.

use spark_metadata::{
    FunctionCodeGen, FunctionDescriptor, MetadataRegistry, ParameterKind, ParameterSpec,
    PlatformWriter, Scope,
};
use spark_types::{CompilationContext, Expression, ExprNode, ExprNodeKind, Grammar, ParsedExpression};

use crate::error::{CodegenError, CodegenResult};

/// Maximum nesting depth of sub-expression compilations.
///
/// Recursion depth equals the nesting depth of the source text, so a
/// bound keeps pathological input from exhausting the stack.
pub const MAX_SUBEXPRESSION_DEPTH: u32 = 32;

/// Compile one formula into a code fragment.
///
/// Parses `text` under `grammar`, then compiles the nodes against the
/// registry and scope. The writer accumulates include registrations and
/// the context accumulates object-list requirements; both are shared
/// with any nested sub-expression compilations. Empty or blank input
/// compiles to the grammar's neutral literal.
pub fn compile(
    text: &str,
    grammar: Grammar,
    registry: &MetadataRegistry,
    scope: &Scope,
    writer: &mut dyn PlatformWriter,
    ctx: &mut CompilationContext,
) -> CodegenResult<String> {
    ExprCompiler::new(registry, scope, grammar).compile(text, writer, ctx)
}

/// One compilation pass over one formula.
///
/// Each nested sub-expression gets a fresh compiler with its own output
/// buffer and error state; the registry, scope, writer and context are
/// shared with the enclosing compilation.
pub struct ExprCompiler<'a> {
    registry: &'a MetadataRegistry,
    scope: &'a Scope,
    grammar: Grammar,
    depth: u32,
    out: String,
}

impl<'a> ExprCompiler<'a> {
    /// Create a top-level compiler.
    pub fn new(registry: &'a MetadataRegistry, scope: &'a Scope, grammar: Grammar) -> Self {
        Self {
            registry,
            scope,
            grammar,
            depth: 0,
            out: String::new(),
        }
    }

    /// Parse and compile `text`, consuming the compiler and returning
    /// the generated fragment.
    pub fn compile(
        self,
        text: &str,
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<String> {
        if self.depth > MAX_SUBEXPRESSION_DEPTH {
            return Err(CodegenError::DepthLimit);
        }
        if text.trim().is_empty() {
            return Ok(self.grammar.neutral_literal().to_string());
        }
        let parsed = spark_parser::parse(text, self.grammar, self.registry).map_err(|e| {
            CodegenError::Parse {
                message: e.to_string(),
                position: e.position(),
            }
        })?;
        self.compile_parsed(&parsed, writer, ctx)
    }

    /// Compile an already-parsed formula.
    pub fn compile_parsed(
        mut self,
        parsed: &ParsedExpression,
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<String> {
        for node in &parsed.nodes {
            self.emit_node(node, writer, ctx)?;
        }
        Ok(self.out)
    }

    // ── Dispatch ──────────────────────────────────────────────────────

    fn emit_node(
        &mut self,
        node: &ExprNode,
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<()> {
        match &node.kind {
            ExprNodeKind::Constant(text) => {
                self.out.push_str(text);
                Ok(())
            }
            ExprNodeKind::StaticCall { name, params } => {
                self.emit_static_call(name, params, writer, ctx)
            }
            ExprNodeKind::ObjectCall { name, params } => {
                self.emit_object_call(name, params, writer, ctx)
            }
            ExprNodeKind::BehaviorCall { name, params } => {
                self.emit_behavior_call(name, params, writer, ctx)
            }
            ExprNodeKind::SubExpr { expression } => {
                self.emit_sub_expression(expression, writer, ctx)
            }
        }
    }

    // ── Static calls ──────────────────────────────────────────────────

    fn emit_static_call(
        &mut self,
        name: &str,
        params: &[Expression],
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<()> {
        // Anonymous construct: an empty name under the string grammar is
        // a bare string literal, whatever other metadata might say.
        if name.is_empty() && self.grammar == Grammar::Text {
            if let Some(first) = params.first() {
                self.out.push_str(&writer.string_literal(first.text()));
            }
            return Ok(());
        }

        let registry = self.registry;
        let desc = registry
            .function(self.grammar, name)
            .ok_or_else(|| CodegenError::UnknownFunction(name.to_string()))?;
        self.register_include(desc, writer);

        match &desc.codegen {
            FunctionCodeGen::Override(generator) => {
                let code = generator(params, writer, ctx);
                self.out.push_str(&code);
                Ok(())
            }
            FunctionCodeGen::Standard {
                call_name,
                utf8,
                parameters,
            } => {
                let codes = self.parameters_code(params, parameters, writer, ctx)?;
                let call = format!("{}({})", call_name, codes.join(", "));
                self.push_wrapped(call, *utf8, writer);
                Ok(())
            }
        }
    }

    // ── Object & behavior calls ───────────────────────────────────────

    fn emit_object_call(
        &mut self,
        name: &str,
        params: &[Expression],
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<()> {
        let registry = self.registry;
        let desc = registry
            .object_function(self.grammar, name)
            .ok_or_else(|| CodegenError::UnknownFunction(name.to_string()))?;
        self.register_include(desc, writer);

        // Slot 0 is the symbolic object name. Without it there is no
        // call to shape; emit nothing.
        if params.is_empty() {
            return Ok(());
        }

        match &desc.codegen {
            FunctionCodeGen::Override(generator) => {
                let code = generator(params, writer, ctx);
                self.out.push_str(&code);
                Ok(())
            }
            FunctionCodeGen::Standard {
                call_name,
                utf8,
                parameters,
            } => {
                let joined = self
                    .parameters_code(
                        &params[1..],
                        parameters.get(1..).unwrap_or(&[]),
                        writer,
                        ctx,
                    )?
                    .join(", ");

                let mut output = self.grammar.neutral_literal().to_string();
                for instance in writer.expand_object_name(params[0].text(), self.scope) {
                    ctx.require_object_list(&instance);
                    // An unregistered type folds against the default
                    // descriptor; zero instances leave the neutral
                    // literal untouched.
                    let object = self
                        .scope
                        .object_type(&instance)
                        .and_then(|t| registry.object(t))
                        .cloned()
                        .unwrap_or_default();
                    for file in &object.include_files {
                        writer.add_include(file);
                    }
                    output = writer.object_accessor_call(
                        &instance, &object, call_name, &joined, &output, ctx,
                    );
                }
                self.push_wrapped(output, *utf8, writer);
                Ok(())
            }
        }
    }

    fn emit_behavior_call(
        &mut self,
        name: &str,
        params: &[Expression],
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<()> {
        let registry = self.registry;
        let desc = registry
            .behavior_function(self.grammar, name)
            .ok_or_else(|| CodegenError::UnknownFunction(name.to_string()))?;
        self.register_include(desc, writer);

        // Slots 0 and 1 are the object and behavior names.
        if params.len() < 2 {
            return Ok(());
        }

        match &desc.codegen {
            FunctionCodeGen::Override(generator) => {
                let code = generator(params, writer, ctx);
                self.out.push_str(&code);
                Ok(())
            }
            FunctionCodeGen::Standard {
                call_name,
                utf8,
                parameters,
            } => {
                let joined = self
                    .parameters_code(
                        &params[2..],
                        parameters.get(2..).unwrap_or(&[]),
                        writer,
                        ctx,
                    )?
                    .join(", ");

                let behavior_name = params[1].text();
                let behavior = self
                    .scope
                    .behavior_type(behavior_name)
                    .and_then(|t| registry.behavior(t))
                    .cloned()
                    .unwrap_or_default();

                let mut output = self.grammar.neutral_literal().to_string();
                for instance in writer.expand_object_name(params[0].text(), self.scope) {
                    ctx.require_object_list(&instance);
                    for file in &behavior.include_files {
                        writer.add_include(file);
                    }
                    output = writer.behavior_accessor_call(
                        &instance,
                        behavior_name,
                        &behavior,
                        call_name,
                        &joined,
                        &output,
                        ctx,
                    );
                }
                self.push_wrapped(output, *utf8, writer);
                Ok(())
            }
        }
    }

    // ── Sub-expressions ───────────────────────────────────────────────

    /// A parenthesized group compiles through a fresh compiler and its
    /// output is incorporated into this buffer, parentheses restored.
    fn emit_sub_expression(
        &mut self,
        expression: &Expression,
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<()> {
        let code = self.compile_sub(self.grammar, expression, writer, ctx)?;
        self.out.push('(');
        self.out.push_str(&code);
        self.out.push(')');
        Ok(())
    }

    /// Compile a nested formula with a fresh compiler one level deeper,
    /// sharing the writer and context. A failure anywhere below carries
    /// its message and position up unchanged.
    fn compile_sub(
        &self,
        grammar: Grammar,
        expression: &Expression,
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<String> {
        let nested = ExprCompiler {
            registry: self.registry,
            scope: self.scope,
            grammar,
            depth: self.depth + 1,
            out: String::new(),
        };
        nested.compile(expression.text(), writer, ctx)
    }

    // ── Parameters ────────────────────────────────────────────────────

    /// Synthesise code for each parameter against its declared spec.
    /// Expression kinds recurse through the compiler; platform kinds go
    /// to the writer; slots beyond the declared specs pass through raw.
    fn parameters_code(
        &self,
        params: &[Expression],
        specs: &[ParameterSpec],
        writer: &mut dyn PlatformWriter,
        ctx: &mut CompilationContext,
    ) -> CodegenResult<Vec<String>> {
        let mut codes = Vec::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            let code = match specs.get(i) {
                Some(spec) => match spec.kind {
                    ParameterKind::Expression => {
                        self.compile_sub(Grammar::Number, param, writer, ctx)?
                    }
                    ParameterKind::StringExpression => {
                        self.compile_sub(Grammar::Text, param, writer, ctx)?
                    }
                    _ => writer.parameter_code(param, spec, self.scope, ctx),
                },
                None => param.text().to_string(),
            };
            codes.push(code);
        }
        Ok(codes)
    }

    // ── Shaping helpers ───────────────────────────────────────────────

    fn register_include(&self, desc: &FunctionDescriptor, writer: &mut dyn PlatformWriter) {
        if let Some(file) = &desc.include_file {
            writer.add_include(file);
        }
    }

    /// Append `code`, wrapping string-grammar values that are not yet
    /// UTF-8 in the platform's conversion call.
    fn push_wrapped(&mut self, code: String, utf8: bool, writer: &mut dyn PlatformWriter) {
        if self.grammar == Grammar::Text && !utf8 {
            self.out.push_str(&writer.locale_to_utf8(code));
        } else {
            self.out.push_str(&code);
        }
    }
}
