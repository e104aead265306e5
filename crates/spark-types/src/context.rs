//! Per-compilation mutable state shared across nested compilations.

use std::collections::BTreeSet;

/// Side-channel requirements discovered while compiling one statement.
///
/// The compiler marks every concrete object instance whose picked-object
/// list must be materialised in the generated scope before the emitted
/// fragment runs. Markers are additive: nothing is ever removed during a
/// pass, and the same context is shared by every nested sub-expression
/// compilation belonging to the same statement.
///
/// Insertion order is not significant, only presence, so the set iterates
/// in name order to keep generated scaffolding deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationContext {
    object_lists: BTreeSet<String>,
}

impl CompilationContext {
    /// Create an empty context for one top-level compilation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an object instance list as required in the current scope.
    pub fn require_object_list(&mut self, object: impl Into<String>) {
        self.object_lists.insert(object.into());
    }

    /// Returns `true` if the instance list for `object` has been marked.
    pub fn is_object_list_required(&self, object: &str) -> bool {
        self.object_lists.contains(object)
    }

    /// The required instance lists, in name order.
    pub fn required_object_lists(&self) -> impl Iterator<Item = &str> {
        self.object_lists.iter().map(String::as_str)
    }

    /// Union another context's markers into this one.
    ///
    /// For callers that compile independent statements with isolated
    /// contexts and combine the requirements afterwards.
    pub fn merge(&mut self, other: &CompilationContext) {
        self.object_lists
            .extend(other.object_lists.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_additive() {
        let mut ctx = CompilationContext::new();
        ctx.require_object_list("Hero");
        ctx.require_object_list("Enemy");
        ctx.require_object_list("Hero");
        let lists: Vec<_> = ctx.required_object_lists().collect();
        assert_eq!(lists, vec!["Enemy", "Hero"]);
    }

    #[test]
    fn test_is_required() {
        let mut ctx = CompilationContext::new();
        assert!(!ctx.is_object_list_required("Hero"));
        ctx.require_object_list("Hero");
        assert!(ctx.is_object_list_required("Hero"));
    }

    #[test]
    fn test_merge_is_set_union() {
        let mut a = CompilationContext::new();
        a.require_object_list("Hero");
        let mut b = CompilationContext::new();
        b.require_object_list("Enemy");
        b.require_object_list("Hero");
        a.merge(&b);
        let lists: Vec<_> = a.required_object_lists().collect();
        assert_eq!(lists, vec!["Enemy", "Hero"]);
    }
}
