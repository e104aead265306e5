//! JavaScript target writer.
//!
//! Emits fragments against the `sparkrt` runtime. Object instances are
//! addressed through per-instance pick lists named `GD<name>Objects`;
//! an accessor call on an instance reads the first picked object and
//! falls back to the previous step of the fold when the list is empty.

use std::collections::BTreeSet;

use spark_metadata::{
    BehaviorDescriptor, ObjectDescriptor, ParameterKind, ParameterSpec, PlatformWriter, Scope,
};
use spark_types::{CompilationContext, Expression};

/// The name of the pick list variable holding the expanded instances of
/// `name`. Characters outside `[A-Za-z0-9]` are mangled to `_` so any
/// declared object name yields a valid identifier.
pub fn object_list_name(name: &str) -> String {
    let mangled: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("GD{mangled}Objects")
}

/// Writer producing JavaScript against the `sparkrt` runtime.
///
/// Accumulates registered runtime files over one generation pass;
/// [`JsWriter::includes`] yields them sorted for deterministic output.
#[derive(Debug, Default)]
pub struct JsWriter {
    includes: BTreeSet<String>,
}

impl JsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime files registered so far, in sorted order.
    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(String::as_str)
    }
}

impl PlatformWriter for JsWriter {
    fn add_include(&mut self, file: &str) {
        self.includes.insert(file.to_string());
    }

    fn string_literal(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 2);
        out.push('"');
        for c in raw.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                _ => out.push(c),
            }
        }
        out.push('"');
        out
    }

    fn locale_to_utf8(&self, code: String) -> String {
        format!("sparkrt.str.fromLocale({code})")
    }

    fn expand_object_name(&self, name: &str, scope: &Scope) -> Vec<String> {
        if let Some(members) = scope.group(name) {
            members.to_vec()
        } else if scope.has_object(name) {
            vec![name.to_string()]
        } else {
            Vec::new()
        }
    }

    fn parameter_code(
        &mut self,
        expr: &Expression,
        spec: &ParameterSpec,
        _scope: &Scope,
        ctx: &mut CompilationContext,
    ) -> String {
        match spec.kind {
            ParameterKind::Object => {
                let list = object_list_name(expr.text());
                ctx.require_object_list(expr.text());
                list
            }
            ParameterKind::Behavior | ParameterKind::Identifier => {
                self.string_literal(expr.text())
            }
            ParameterKind::Operator => expr.text().to_string(),
            ParameterKind::Variable => format!(
                "runtimeScene.getVariables().get({})",
                self.string_literal(expr.text())
            ),
            // Expression kinds are compiled upstream; anything else
            // passes through as written.
            ParameterKind::Expression | ParameterKind::StringExpression => {
                expr.text().to_string()
            }
        }
    }

    fn object_accessor_call(
        &mut self,
        instance: &str,
        _object: &ObjectDescriptor,
        call_name: &str,
        params: &str,
        previous: &str,
        _ctx: &mut CompilationContext,
    ) -> String {
        let list = object_list_name(instance);
        format!("({list}.length ? {list}[0].{call_name}({params}) : {previous})")
    }

    fn behavior_accessor_call(
        &mut self,
        instance: &str,
        behavior_name: &str,
        _behavior: &BehaviorDescriptor,
        call_name: &str,
        params: &str,
        previous: &str,
        _ctx: &mut CompilationContext,
    ) -> String {
        let list = object_list_name(instance);
        let behavior = self.string_literal(behavior_name);
        format!(
            "({list}.length ? {list}[0].getBehavior({behavior}).{call_name}({params}) : {previous})"
        )
    }
}
