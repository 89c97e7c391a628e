//! Type inference: the per-node rules, walked directly over the AST
//! with unification performed as each node is visited (no separate
//! constraint-generation-then-solving phase).

use crate::ast::{Node, NodeKind};
use crate::env::Environment;
use crate::errors::EngineError;
use crate::fresh::fresh;
use crate::prelude::*;
use crate::types::TypeId;
use crate::unify::unify;

/// The stack of lexical scopes introduced by `fn`/`let`/`letrec`, read
/// innermost-first; falls back to `env`'s term table when a name isn't
/// found in any frame.
#[derive(Debug, Default)]
pub struct Scope {
    frames: Vec<BTreeMap<String, TypeId>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope { frames: Vec::new() }
    }

    fn push(&mut self) {
        self.frames.push(BTreeMap::new());
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    fn bind(&mut self, name: impl Into<String>, ty: TypeId) {
        self.frames.last_mut().expect("bind called with no active scope frame").insert(name.into(), ty);
    }

    fn lookup(&self, name: &str) -> Option<TypeId> {
        self.frames.iter().rev().find_map(|frame| frame.get(name).copied())
    }
}

/// Infer `node`'s type, recording it in `node.ty`, and return it.
///
/// `non_generic` is the set of type variables bound by an enclosing
/// lambda parameter (or, transiently, a letrec group): a variable
/// reference only generalizes (gets a fresh copy per use) over variables
/// that don't occur in any of these.
pub fn infer(
    node: &mut Node,
    env: &mut Environment,
    scope: &mut Scope,
    non_generic: &mut Vec<TypeId>,
) -> Result<TypeId, EngineError> {
    let ty = infer_kind(&mut node.kind, env, scope, non_generic)?;
    node.ty = Some(ty);
    Ok(ty)
}

fn infer_kind(
    kind: &mut NodeKind,
    env: &mut Environment,
    scope: &mut Scope,
    non_generic: &mut Vec<TypeId>,
) -> Result<TypeId, EngineError> {
    match kind {
        NodeKind::Literal(_) => Ok(env.arena.new_const("Int")),

        NodeKind::Variable(name) => lookup_and_instantiate(name, env, scope, non_generic),

        NodeKind::Abstraction { params, body } => {
            log::trace!("entering abstraction scope with {} parameter(s)", params.len());
            let param_tys: Vec<TypeId> = params.iter().map(|_| env.arena.new_var()).collect();
            scope.push();
            for (name, ty) in params.iter().zip(param_tys.iter()) {
                scope.bind(name.clone(), *ty);
            }
            let added = param_tys.len();
            non_generic.extend(param_tys.iter().copied());
            let body_ty = infer(body, env, scope, non_generic)?;
            non_generic.truncate(non_generic.len() - added);
            scope.pop();
            Ok(env.arena.new_fun(param_tys, body_ty))
        }

        NodeKind::Application { rator, rands } => {
            let rator_ty = infer(rator, env, scope, non_generic)?;
            let mut rand_tys = Vec::with_capacity(rands.len());
            for rand in rands.iter_mut() {
                rand_tys.push(infer(rand, env, scope, non_generic)?);
            }
            let result_ty = env.arena.new_var();
            let expected_fun = env.arena.new_fun(rand_tys, result_ty);
            unify(&mut env.arena, rator_ty, expected_fun)?;
            Ok(result_ty)
        }

        NodeKind::Let { bindings, body } => {
            log::trace!("entering let scope with {} binding(s)", bindings.len());
            scope.push();
            for (name, value) in bindings.iter_mut() {
                let value_ty = infer(value, env, scope, non_generic)?;
                scope.bind(name.clone(), value_ty);
            }
            let result = infer(body, env, scope, non_generic);
            scope.pop();
            result
        }

        NodeKind::Letrec { bindings, body } => {
            log::trace!("entering letrec scope with {} binding(s)", bindings.len());
            scope.push();
            let placeholder_tys: Vec<TypeId> = bindings.iter().map(|_| env.arena.new_var()).collect();
            for ((name, _), ty) in bindings.iter().zip(placeholder_tys.iter()) {
                scope.bind(name.clone(), *ty);
            }
            non_generic.extend(placeholder_tys.iter().copied());
            for ((_, value), placeholder) in bindings.iter_mut().zip(placeholder_tys.iter()) {
                let value_ty = infer(value, env, scope, non_generic)?;
                unify(&mut env.arena, *placeholder, value_ty)?;
            }
            non_generic.truncate(non_generic.len() - placeholder_tys.len());
            let result = infer(body, env, scope, non_generic);
            scope.pop();
            result
        }

        NodeKind::If { cond, then_branch, else_branch } => {
            let cond_ty = infer(cond, env, scope, non_generic)?;
            let bool_ty = env.arena.new_const("Bool");
            unify(&mut env.arena, cond_ty, bool_ty)?;
            let then_ty = infer(then_branch, env, scope, non_generic)?;
            let else_ty = infer(else_branch, env, scope, non_generic)?;
            unify(&mut env.arena, then_ty, else_ty)?;
            Ok(then_ty)
        }

        NodeKind::Sequence(exprs) => {
            let Some((last, init)) = exprs.split_last_mut() else {
                return Ok(env.arena.new_const("Unit"));
            };
            for expr in init.iter_mut() {
                infer(expr, env, scope, non_generic)?;
            }
            infer(last, env, scope, non_generic)
        }

        NodeKind::HostEscape { annotated_ty, .. } => Ok(*annotated_ty),
    }
}

fn lookup_and_instantiate(
    name: &str,
    env: &mut Environment,
    scope: &Scope,
    non_generic: &[TypeId],
) -> Result<TypeId, EngineError> {
    let declared = scope
        .lookup(name)
        .or_else(|| env.lookup_term(name).and_then(|info| info.effective_type()));
    match declared {
        Some(ty) => Ok(fresh(&mut env.arena, ty, non_generic)),
        None => Err(EngineError::UnboundVariable { name: name.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Node, NodeKind};

    fn infer_expr(node: &mut Node, env: &mut Environment) -> Result<TypeId, EngineError> {
        let mut scope = Scope::new();
        let mut non_generic = Vec::new();
        infer(node, env, &mut scope, &mut non_generic)
    }

    #[test]
    fn literal_infers_to_int() {
        let mut env = Environment::with_builtins();
        let mut node = Node::new(NodeKind::Literal(42));
        let ty = infer_expr(&mut node, &mut env).unwrap();
        assert_eq!(env.arena.display(ty), "Int");
    }

    #[test]
    fn identity_function_is_polymorphic() {
        // (fn (x) x)
        let mut env = Environment::with_builtins();
        let mut node = Node::new(NodeKind::Abstraction {
            params: vec!["x".to_string()],
            body: Box::new(Node::new(NodeKind::Variable("x".to_string()))),
        });
        let ty = infer_expr(&mut node, &mut env).unwrap();
        assert_eq!(env.arena.display(ty), "a -> a");
    }

    #[test]
    fn let_bound_identity_used_at_two_types() {
        // (let ((id (fn (x) x))) (if (id true) (id 1) (id 2)))
        let mut env = Environment::with_builtins();
        let id_fn = Node::new(NodeKind::Abstraction {
            params: vec!["x".to_string()],
            body: Box::new(Node::new(NodeKind::Variable("x".to_string()))),
        });
        let call = |arg: NodeKind| {
            Node::new(NodeKind::Application {
                rator: Box::new(Node::new(NodeKind::Variable("id".to_string()))),
                rands: vec![Node::new(arg)],
            })
        };
        let mut node = Node::new(NodeKind::Let {
            bindings: vec![("id".to_string(), id_fn)],
            body: Box::new(Node::new(NodeKind::If {
                cond: Box::new(call(NodeKind::Variable("true_lit".to_string()))),
                then_branch: Box::new(call(NodeKind::Literal(1))),
                else_branch: Box::new(call(NodeKind::Literal(2))),
            })),
        });
        // seed a boolean literal binding since this spec has no boolean
        // literal syntax of its own
        let bool_ty = env.arena.new_const("Bool");
        env.declare_term("true_lit", bool_ty);
        let ty = infer_expr(&mut node, &mut env).unwrap();
        assert_eq!(env.arena.display(ty), "Int");
    }

    #[test]
    fn lambda_bound_variable_is_monomorphic() {
        // (fn (x) (x x)) must fail the occurs check
        let mut node = Node::new(NodeKind::Abstraction {
            params: vec!["x".to_string()],
            body: Box::new(Node::new(NodeKind::Application {
                rator: Box::new(Node::new(NodeKind::Variable("x".to_string()))),
                rands: vec![Node::new(NodeKind::Variable("x".to_string()))],
            })),
        });
        let mut env = Environment::with_builtins();
        let err = infer_expr(&mut node, &mut env).unwrap_err();
        assert!(matches!(err, EngineError::InfiniteType { .. }));
    }

    #[test]
    fn unbound_variable_is_an_error() {
        let mut env = Environment::with_builtins();
        let mut node = Node::new(NodeKind::Variable("nope".to_string()));
        assert!(matches!(
            infer_expr(&mut node, &mut env),
            Err(EngineError::UnboundVariable { .. })
        ));
    }

    #[test]
    fn if_branches_must_unify() {
        let mut env = Environment::with_builtins();
        let mut node = Node::new(NodeKind::If {
            cond: Box::new(Node::new(NodeKind::Application {
                rator: Box::new(Node::new(NodeKind::Variable("=".to_string()))),
                rands: vec![Node::new(NodeKind::Literal(1)), Node::new(NodeKind::Literal(1))],
            })),
            then_branch: Box::new(Node::new(NodeKind::Literal(1))),
            else_branch: Box::new(Node::new(NodeKind::Literal(2))),
        });
        let ty = infer_expr(&mut node, &mut env).unwrap();
        assert_eq!(env.arena.display(ty), "Int");
    }

    #[test]
    fn empty_sequence_infers_to_unit() {
        let mut env = Environment::with_builtins();
        let mut node = Node::new(NodeKind::Sequence(Vec::new()));
        let ty = infer_expr(&mut node, &mut env).unwrap();
        assert_eq!(env.arena.display(ty), "Unit");
    }
}
