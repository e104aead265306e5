//! Symbolic-name resolution for one game screen.

use std::collections::HashMap;

/// The enclosing unit a formula compiles against.
///
/// Maps the symbolic names a user types — object names, group names,
/// behavior names — to concrete types and group members. Built from the
/// project/screen definition before compilation starts; read-only during
/// a pass.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Object instance name → concrete object type name.
    object_types: HashMap<String, String>,
    /// Behavior name → behavior type name.
    behavior_types: HashMap<String, String>,
    /// Group name → member object names, in declared order.
    groups: HashMap<String, Vec<String>>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an object of the given concrete type.
    pub fn declare_object(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.object_types.insert(name.into(), type_name.into());
    }

    /// Declare a behavior of the given behavior type.
    pub fn declare_behavior(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.behavior_types.insert(name.into(), type_name.into());
    }

    /// Declare an object group with its members in order.
    pub fn declare_group(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.groups
            .insert(name.into(), members.into_iter().map(Into::into).collect());
    }

    /// The concrete type of a declared object, if any.
    pub fn object_type(&self, name: &str) -> Option<&str> {
        self.object_types.get(name).map(String::as_str)
    }

    /// The behavior type of a declared behavior, if any.
    pub fn behavior_type(&self, name: &str) -> Option<&str> {
        self.behavior_types.get(name).map(String::as_str)
    }

    /// The members of a declared group, in declared order.
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Returns `true` if `name` is a declared object (not a group).
    pub fn has_object(&self, name: &str) -> bool {
        self.object_types.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_resolution() {
        let mut scope = Scope::new();
        scope.declare_object("Hero", "Sprite");
        assert_eq!(scope.object_type("Hero"), Some("Sprite"));
        assert_eq!(scope.object_type("Ghost"), None);
        assert!(scope.has_object("Hero"));
    }

    #[test]
    fn test_group_preserves_declared_order() {
        let mut scope = Scope::new();
        scope.declare_group("Enemies", ["Ghost", "Bat", "Slime"]);
        assert_eq!(
            scope.group("Enemies").unwrap(),
            &["Ghost", "Bat", "Slime"]
        );
        assert!(!scope.has_object("Enemies"));
    }

    #[test]
    fn test_behavior_resolution() {
        let mut scope = Scope::new();
        scope.declare_behavior("Physics", "PhysicsBehavior");
        assert_eq!(scope.behavior_type("Physics"), Some("PhysicsBehavior"));
    }
}
