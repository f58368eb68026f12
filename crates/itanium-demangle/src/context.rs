//! Back-reference tables for a single decode.

use crate::ast::TypeNode;

/// The substitution and template-parameter tables of one `demangle` call.
///
/// Both tables are created empty for every top-level call and dropped with
/// it. The substitution table only grows, except that a transient scope
/// (template argument lists) is rolled back to its [`Checkpoint`] when the
/// scope closes.
#[derive(Debug, Clone, Default)]
pub struct DecodeContext {
    substitutions: Vec<TypeNode>,
    template_params: Vec<TypeNode>,
}

/// Length of the substitution table at the start of a transient scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl DecodeContext {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a substitution candidate.
    pub fn push_substitution(&mut self, node: TypeNode) {
        self.substitutions.push(node);
    }

    /// Look up `S_` (index 0) or `S<n>_` (index n).
    pub fn substitution(&self, index: usize) -> Option<&TypeNode> {
        self.substitutions.get(index)
    }

    /// Number of recorded substitutions.
    pub fn substitution_count(&self) -> usize {
        self.substitutions.len()
    }

    /// Bind the template-parameter table. Later bindings replace earlier ones.
    pub fn bind_template_params(&mut self, params: Vec<TypeNode>) {
        self.template_params = params;
    }

    /// Look up `T_` (index 0) or `T<n>_` (index n).
    pub fn template_param(&self, index: usize) -> Option<&TypeNode> {
        self.template_params.get(index)
    }

    /// The bound template parameters.
    pub fn template_params(&self) -> &[TypeNode] {
        &self.template_params
    }

    /// Open a transient substitution scope seeded with the current entries.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.substitutions.len())
    }

    /// Close a transient scope, dropping every entry added since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.substitutions.truncate(checkpoint.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::BuiltinType;

    fn named(s: &str) -> TypeNode {
        TypeNode::Named(s.to_string())
    }

    #[test]
    fn test_substitutions_keep_decode_order() {
        let mut ctx = DecodeContext::new();
        ctx.push_substitution(named("A"));
        ctx.push_substitution(named("B"));
        ctx.push_substitution(named("C"));

        assert_eq!(ctx.substitution(0), Some(&named("A")));
        assert_eq!(ctx.substitution(1), Some(&named("B")));
        assert_eq!(ctx.substitution(2), Some(&named("C")));
        assert_eq!(ctx.substitution(3), None);
    }

    #[test]
    fn test_rollback_restores_outer_scope() {
        let mut ctx = DecodeContext::new();
        ctx.push_substitution(named("outer"));
        let cp = ctx.checkpoint();
        ctx.push_substitution(named("inner"));
        assert_eq!(ctx.substitution_count(), 2);

        ctx.rollback(cp);
        assert_eq!(ctx.substitution_count(), 1);
        assert_eq!(ctx.substitution(0), Some(&named("outer")));
    }

    #[test]
    fn test_template_params_are_separate() {
        let mut ctx = DecodeContext::new();
        ctx.bind_template_params(vec![TypeNode::Basic(BuiltinType::Int)]);

        assert_eq!(ctx.template_param(0), Some(&TypeNode::Basic(BuiltinType::Int)));
        assert_eq!(ctx.template_param(1), None);
        assert_eq!(ctx.substitution(0), None);
    }
}
