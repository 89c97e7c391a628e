//! The type environment: the constructor table and the term table that
//! together give every in-scope name a meaning, plus the arena both
//! tables' types live in.
//!
//! Grounded on `type_inference/mod.rs`'s `TypeInference` struct (the
//! single owner of inference state) and on `mesh-typeck::builtins` for
//! the shape of a builtins-seeding constructor.

use crate::ast::Node;
use crate::prelude::*;
use crate::tycon::{DataCtor, TyCon};
use crate::types::{TypeArena, TypeId};

/// Everything known about a top-level term: its declared type (from a
/// `declare` form, if any), its derived type (once inference has run over
/// its definition), and the lowered AST + codegen name a downstream
/// generator would need.
#[derive(Debug, Clone)]
pub struct VarInfo {
    pub declared_type: Option<TypeId>,
    pub derived_type: Option<TypeId>,
    pub ast: Option<Node>,
    pub codegen_name: String,
}

impl VarInfo {
    fn new(codegen_name: impl Into<String>) -> Self {
        VarInfo { declared_type: None, derived_type: None, ast: None, codegen_name: codegen_name.into() }
    }

    /// The type inference should use when this name is referenced: the
    /// declared type if one was given, otherwise the derived type.
    pub fn effective_type(&self) -> Option<TypeId> {
        self.declared_type.or(self.derived_type)
    }
}

/// The type-constructor table and the term table, plus the arena they
/// both reference into. This is the one piece of mutable state threaded
/// through parsing, inference and elaboration.
#[derive(Debug)]
pub struct Environment {
    pub arena: TypeArena,
    /// `pub(crate)` rather than method-guarded so `type_parser::parse_type`
    /// can borrow this table and `arena` disjointly at the same time.
    pub(crate) tycons: BTreeMap<String, TyCon>,
    terms: BTreeMap<String, VarInfo>,
}

impl Environment {
    /// An environment with no type constructors and no terms at all.
    pub fn new() -> Self {
        Environment { arena: TypeArena::new(), tycons: BTreeMap::new(), terms: BTreeMap::new() }
    }

    /// An environment pre-seeded with the `Int`/`Bool` type constructors
    /// integer literals and `if` conditions need, plus the arithmetic
    /// and comparison operators a minimal embedding needs to be useful.
    pub fn with_builtins() -> Self {
        let mut env = Self::new();
        env.tycons.insert("Int".to_string(), TyCon::new("Int", 0));
        env.tycons.insert("Bool".to_string(), TyCon::new("Bool", 0));

        let int_ty = env.arena.new_const("Int");
        let bool_ty = env.arena.new_const("Bool");
        let binop_int = env.arena.new_fun(vec![int_ty, int_ty], int_ty);
        for name in ["+", "-", "*"] {
            let mut info = VarInfo::new(name);
            info.declared_type = Some(binop_int);
            env.terms.insert(name.to_string(), info);
        }
        let cmp = env.arena.new_fun(vec![int_ty, int_ty], bool_ty);
        let mut eq_info = VarInfo::new("=");
        eq_info.declared_type = Some(cmp);
        env.terms.insert("=".to_string(), eq_info);
        env
    }

    pub fn lookup_tycon(&self, name: &str) -> Option<&TyCon> {
        self.tycons.get(name)
    }

    pub fn lookup_term(&self, name: &str) -> Option<&VarInfo> {
        self.terms.get(name)
    }

    /// Register a type constructor. Returns `Err(name)` if `name` was
    /// already declared, leaving the existing constructor untouched — the
    /// decision to warn, error or proceed is left to the caller, so
    /// elaboration (not this method) decides what to do with the `Err`.
    pub fn declare_tycon(&mut self, name: impl Into<String>, arity: usize) -> Result<(), String> {
        let name = name.into();
        if self.tycons.contains_key(&name) {
            return Err(name);
        }
        self.tycons.insert(name.clone(), TyCon::new(name, arity));
        Ok(())
    }

    /// Overwrite an existing type constructor's entry (its accumulated
    /// data constructors are discarded). Used only by the elaborator
    /// after `declare_tycon` reports a clobber, so redefining a type
    /// doesn't leave the previous definition's constructors mixed in
    /// with the new one's.
    pub fn redeclare_tycon(&mut self, name: impl Into<String>, arity: usize) {
        let name = name.into();
        self.tycons.insert(name.clone(), TyCon::new(name, arity));
    }

    pub fn add_data_constructor(&mut self, tycon_name: &str, ctor: DataCtor) {
        if let Some(tc) = self.tycons.get_mut(tycon_name) {
            tc.data_constructors.push(ctor);
        }
    }

    /// Declare a term's type ahead of its definition (the `declare` form).
    pub fn declare_term(&mut self, name: impl Into<String>, ty: TypeId) {
        let name = name.into();
        let info = self.terms.entry(name.clone()).or_insert_with(|| VarInfo::new(name));
        info.declared_type = Some(ty);
    }

    /// Record a definition. Returns `true` if this clobbers an existing
    /// definition (the caller logs and emits an `assign` descriptor for
    /// that case rather than a `define` one).
    pub fn define_term(&mut self, name: impl Into<String>, ast: Node, derived_type: TypeId) -> bool {
        let name = name.into();
        let already_defined =
            self.terms.get(&name).map(|info| info.derived_type.is_some()).unwrap_or(false);
        let info = self.terms.entry(name.clone()).or_insert_with(|| VarInfo::new(name));
        info.ast = Some(ast);
        info.derived_type = Some(derived_type);
        already_defined
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_seed_int_and_bool() {
        let env = Environment::with_builtins();
        assert_eq!(env.lookup_tycon("Int").unwrap().arity, 0);
        assert_eq!(env.lookup_tycon("Bool").unwrap().arity, 0);
        assert!(env.lookup_term("+").is_some());
        assert!(env.lookup_term("=").is_some());
    }

    #[test]
    fn redeclaring_a_tycon_is_rejected() {
        let mut env = Environment::with_builtins();
        assert!(env.declare_tycon("Int", 0).is_err());
    }

    #[test]
    fn define_term_reports_redefinition() {
        use crate::ast::{Node, NodeKind};
        let mut env = Environment::with_builtins();
        let int_ty = env.arena.new_const("Int");
        let lit = Node { kind: NodeKind::Literal(1), ty: None };
        assert!(!env.define_term("x", lit.clone(), int_ty));
        assert!(env.define_term("x", lit, int_ty));
    }
}
