//! Built-in engine descriptors.
//!
//! Registers the expression functions every Spark project can use:
//! variable access, common math helpers, string helpers, and the core
//! object/behavior functions. Extensions register their own descriptors
//! on top of these with the same builder API.

use std::sync::Arc;

use spark_types::Grammar;

use crate::descriptor::{
    BehaviorDescriptor, FunctionDescriptor, ObjectDescriptor, ParameterKind,
};
use crate::registry::MetadataRegistry;

/// Register all built-in descriptors into `reg`.
pub fn register(reg: &mut MetadataRegistry) {
    register_variables(reg);
    register_math(reg);
    register_strings(reg);
    register_objects(reg);
}

/// Variable access, numeric and string, scene and global.
fn register_variables(reg: &mut MetadataRegistry) {
    reg.add_function(
        "Variable",
        FunctionDescriptor::number("sparkrt.vars.getNumber")
            .with_include("vars.js")
            .with_parameter(ParameterKind::Variable),
    );
    reg.add_function(
        "GlobalVariable",
        FunctionDescriptor::number("sparkrt.vars.getGlobalNumber")
            .with_include("vars.js")
            .with_parameter(ParameterKind::Variable),
    );
    reg.add_function(
        "VariableString",
        FunctionDescriptor::string("sparkrt.vars.getString")
            .with_include("vars.js")
            .with_parameter(ParameterKind::Variable)
            .utf8(),
    );
    reg.add_function(
        "GlobalVariableString",
        FunctionDescriptor::string("sparkrt.vars.getGlobalString")
            .with_include("vars.js")
            .with_parameter(ParameterKind::Variable)
            .utf8(),
    );
}

/// Common math helpers.
fn register_math(reg: &mut MetadataRegistry) {
    reg.add_function(
        "abs",
        FunctionDescriptor::number("Math.abs").with_parameter(ParameterKind::Expression),
    );
    reg.add_function(
        "min",
        FunctionDescriptor::number("Math.min")
            .with_parameter(ParameterKind::Expression)
            .with_parameter(ParameterKind::Expression),
    );
    reg.add_function(
        "max",
        FunctionDescriptor::number("Math.max")
            .with_parameter(ParameterKind::Expression)
            .with_parameter(ParameterKind::Expression),
    );
    reg.add_function(
        "clamp",
        FunctionDescriptor::number("sparkrt.math.clamp")
            .with_include("math.js")
            .with_parameter(ParameterKind::Expression)
            .with_parameter(ParameterKind::Expression)
            .with_parameter(ParameterKind::Expression),
    );
    reg.add_function(
        "ToNumber",
        FunctionDescriptor::number("sparkrt.str.toNumber")
            .with_include("str.js")
            .with_parameter(ParameterKind::StringExpression),
    );
}

/// String helpers.
fn register_strings(reg: &mut MetadataRegistry) {
    reg.add_function(
        "ToString",
        FunctionDescriptor::string("sparkrt.str.toString")
            .with_include("str.js")
            .with_parameter(ParameterKind::Expression)
            .utf8(),
    );
    reg.add_function(
        "SubStr",
        FunctionDescriptor::string("sparkrt.str.sub")
            .with_include("str.js")
            .with_parameter(ParameterKind::StringExpression)
            .with_parameter(ParameterKind::Expression)
            .with_parameter(ParameterKind::Expression)
            .utf8(),
    );
    // Formatted by the host C library, so the value needs conversion.
    reg.add_function(
        "LocaleDate",
        FunctionDescriptor::string("sparkrt.time.localeDate")
            .with_include("time.js")
            .with_parameter(ParameterKind::Expression),
    );
    reg.add_function(
        "NewLine",
        FunctionDescriptor::with_override(Grammar::Text, Arc::new(|_, _, _| "\"\\n\"".to_string())),
    );
}

/// Core object/behavior functions and the built-in type descriptors.
fn register_objects(reg: &mut MetadataRegistry) {
    reg.add_object_function(
        "X",
        FunctionDescriptor::number("getX").with_parameter(ParameterKind::Object),
    );
    reg.add_object_function(
        "Y",
        FunctionDescriptor::number("getY").with_parameter(ParameterKind::Object),
    );
    reg.add_object_function(
        "ObjectName",
        FunctionDescriptor::string("getName")
            .with_parameter(ParameterKind::Object)
            .utf8(),
    );
    reg.add_behavior_function(
        "Speed",
        FunctionDescriptor::number("getSpeed")
            .with_parameter(ParameterKind::Object)
            .with_parameter(ParameterKind::Behavior),
    );

    reg.add_object("Sprite", ObjectDescriptor::new(["runtimeobjects/sprite.js"]));
    reg.add_behavior(
        "PhysicsBehavior",
        BehaviorDescriptor::new(["behaviors/physics.js"]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FunctionCodeGen;

    #[test]
    fn test_builtins_register() {
        let reg = MetadataRegistry::with_builtins();
        assert!(reg.function(Grammar::Number, "Variable").is_some());
        assert!(reg.function(Grammar::Text, "VariableString").is_some());
        assert!(reg.function(Grammar::Number, "clamp").is_some());
        assert!(reg.object_function(Grammar::Number, "X").is_some());
        assert!(reg.behavior_function(Grammar::Number, "Speed").is_some());
        assert!(reg.object("Sprite").is_some());
    }

    #[test]
    fn test_newline_is_an_override() {
        let reg = MetadataRegistry::with_builtins();
        let desc = reg.function(Grammar::Text, "NewLine").unwrap();
        assert!(matches!(desc.codegen, FunctionCodeGen::Override(_)));
    }

    #[test]
    fn test_locale_date_needs_conversion() {
        let reg = MetadataRegistry::with_builtins();
        let desc = reg.function(Grammar::Text, "LocaleDate").unwrap();
        match &desc.codegen {
            FunctionCodeGen::Standard { utf8, .. } => assert!(!utf8),
            FunctionCodeGen::Override(_) => panic!("expected standard codegen"),
        }
    }
}
