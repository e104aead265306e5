//! The metadata registry: string-keyed descriptor tables.

use std::collections::HashMap;

use spark_types::Grammar;

use crate::descriptor::{BehaviorDescriptor, FunctionDescriptor, ObjectDescriptor};

/// Registry mapping function names and object/behavior type names to
/// their descriptors.
///
/// Numeric and string formulas use independent namespaces (the same name
/// may denote a different function in each grammar), so every function
/// table is split by [`Grammar`]. Populated once at startup by the
/// extension-registration facility; read-only during compilation.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    number_functions: HashMap<String, FunctionDescriptor>,
    string_functions: HashMap<String, FunctionDescriptor>,
    number_object_functions: HashMap<String, FunctionDescriptor>,
    string_object_functions: HashMap<String, FunctionDescriptor>,
    number_behavior_functions: HashMap<String, FunctionDescriptor>,
    string_behavior_functions: HashMap<String, FunctionDescriptor>,
    objects: HashMap<String, ObjectDescriptor>,
    behaviors: HashMap<String, BehaviorDescriptor>,
}

impl MetadataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in engine descriptors registered.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        crate::builtins::register(&mut reg);
        reg
    }

    // ── Registration ──────────────────────────────────────────────────

    /// Register a free function. The table is chosen by the descriptor's
    /// declared return type.
    pub fn add_function(&mut self, name: impl Into<String>, desc: FunctionDescriptor) {
        let table = match desc.return_type {
            Grammar::Number => &mut self.number_functions,
            Grammar::Text => &mut self.string_functions,
        };
        table.insert(name.into(), desc);
    }

    /// Register a function callable on object instances.
    pub fn add_object_function(&mut self, name: impl Into<String>, desc: FunctionDescriptor) {
        let table = match desc.return_type {
            Grammar::Number => &mut self.number_object_functions,
            Grammar::Text => &mut self.string_object_functions,
        };
        table.insert(name.into(), desc);
    }

    /// Register a function callable on a behavior attached to an object.
    pub fn add_behavior_function(&mut self, name: impl Into<String>, desc: FunctionDescriptor) {
        let table = match desc.return_type {
            Grammar::Number => &mut self.number_behavior_functions,
            Grammar::Text => &mut self.string_behavior_functions,
        };
        table.insert(name.into(), desc);
    }

    /// Register an object type descriptor, keyed by concrete type name.
    pub fn add_object(&mut self, type_name: impl Into<String>, desc: ObjectDescriptor) {
        self.objects.insert(type_name.into(), desc);
    }

    /// Register a behavior type descriptor, keyed by behavior type name.
    pub fn add_behavior(&mut self, type_name: impl Into<String>, desc: BehaviorDescriptor) {
        self.behaviors.insert(type_name.into(), desc);
    }

    // ── Lookups ───────────────────────────────────────────────────────

    /// Look up a free function under the given grammar.
    pub fn function(&self, grammar: Grammar, name: &str) -> Option<&FunctionDescriptor> {
        match grammar {
            Grammar::Number => self.number_functions.get(name),
            Grammar::Text => self.string_functions.get(name),
        }
    }

    /// Look up an object function under the given grammar.
    pub fn object_function(&self, grammar: Grammar, name: &str) -> Option<&FunctionDescriptor> {
        match grammar {
            Grammar::Number => self.number_object_functions.get(name),
            Grammar::Text => self.string_object_functions.get(name),
        }
    }

    /// Look up a behavior function under the given grammar.
    pub fn behavior_function(&self, grammar: Grammar, name: &str) -> Option<&FunctionDescriptor> {
        match grammar {
            Grammar::Number => self.number_behavior_functions.get(name),
            Grammar::Text => self.string_behavior_functions.get(name),
        }
    }

    /// Look up an object type descriptor by concrete type name.
    pub fn object(&self, type_name: &str) -> Option<&ObjectDescriptor> {
        self.objects.get(type_name)
    }

    /// Look up a behavior type descriptor by behavior type name.
    pub fn behavior(&self, type_name: &str) -> Option<&BehaviorDescriptor> {
        self.behaviors.get(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ParameterKind;

    #[test]
    fn test_grammars_are_independent_namespaces() {
        let mut reg = MetadataRegistry::new();
        reg.add_function("Variable", FunctionDescriptor::number("sparkrt.vars.getNumber"));
        reg.add_function("Variable", FunctionDescriptor::string("sparkrt.vars.getString"));

        let num = reg.function(Grammar::Number, "Variable").unwrap();
        let txt = reg.function(Grammar::Text, "Variable").unwrap();
        assert_eq!(num.return_type, Grammar::Number);
        assert_eq!(txt.return_type, Grammar::Text);
    }

    #[test]
    fn test_object_and_behavior_tables() {
        let mut reg = MetadataRegistry::new();
        reg.add_object_function(
            "X",
            FunctionDescriptor::number("getX").with_parameter(ParameterKind::Object),
        );
        reg.add_behavior_function(
            "Speed",
            FunctionDescriptor::number("getSpeed")
                .with_parameter(ParameterKind::Object)
                .with_parameter(ParameterKind::Behavior),
        );
        assert!(reg.object_function(Grammar::Number, "X").is_some());
        assert!(reg.object_function(Grammar::Text, "X").is_none());
        assert!(reg.behavior_function(Grammar::Number, "Speed").is_some());
        assert!(reg.function(Grammar::Number, "X").is_none());
    }

    #[test]
    fn test_type_descriptor_lookup() {
        let mut reg = MetadataRegistry::new();
        reg.add_object("Sprite", ObjectDescriptor::new(["runtimeobjects/sprite.js"]));
        reg.add_behavior(
            "PhysicsBehavior",
            BehaviorDescriptor::new(["behaviors/physics.js"]),
        );
        assert!(reg.object("Sprite").is_some());
        assert!(reg.object("TileMap").is_none());
        assert!(reg.behavior("PhysicsBehavior").is_some());
    }
}
