//! Unification over the arena: `prune` path-compresses resolved
//! variables, `occurs_in_type` guards against building a cyclic type, and
//! `unify` either binds a variable or recurses structurally.
//!
//! Arena-index-as-identity with in-place `instance` mutation on bind,
//! rather than a side substitution map: `prune` is the only place a
//! resolved variable's indirection is ever chased.

use crate::errors::EngineError;
use crate::types::{Type, TypeArena, TypeId};

/// Follow a variable's `instance` chain to its representative type,
/// compressing the chain as it goes so later prunes are O(1).
pub fn prune(arena: &mut TypeArena, t: TypeId) -> TypeId {
    let next = match arena.get(t) {
        Type::Var(v) => v.instance,
        _ => None,
    };
    let Some(next) = next else { return t };
    let final_id = prune(arena, next);
    if let Type::Var(v) = arena.get_mut(t) {
        v.instance = Some(final_id);
    }
    final_id
}

/// Does the pruned variable `v` occur anywhere inside `t`?
pub fn occurs_in_type(arena: &mut TypeArena, v: TypeId, t: TypeId) -> bool {
    let pruned = prune(arena, t);
    if pruned == v {
        return true;
    }
    match arena.get(pruned).clone() {
        Type::Var(_) => false,
        Type::App(app) => app.args.iter().any(|arg| occurs_in_type(arena, v, *arg)),
        Type::Fun(fun) => {
            fun.from.iter().any(|arg| occurs_in_type(arena, v, *arg))
                || occurs_in_type(arena, v, fun.to)
        }
    }
}

/// Unify `a` and `b`: make them describe the same type, or fail. On
/// success, every future `prune` of either id returns the same
/// representative.
pub fn unify(arena: &mut TypeArena, a: TypeId, b: TypeId) -> Result<(), EngineError> {
    let a = prune(arena, a);
    let b = prune(arena, b);
    if a == b {
        return Ok(());
    }

    let a_is_var = matches!(arena.get(a), Type::Var(_));
    let b_is_var = matches!(arena.get(b), Type::Var(_));

    if a_is_var {
        return bind(arena, a, b);
    }
    if b_is_var {
        return bind(arena, b, a);
    }

    match (arena.get(a).clone(), arena.get(b).clone()) {
        (Type::App(ac), Type::App(bc)) => {
            if ac.con != bc.con {
                return Err(EngineError::TypeMismatch {
                    expected: arena.display(a),
                    found: arena.display(b),
                });
            }
            if ac.args.len() != bc.args.len() {
                return Err(EngineError::TyConArity {
                    name: ac.con,
                    expected: ac.args.len(),
                    found: bc.args.len(),
                });
            }
            for (x, y) in ac.args.iter().zip(bc.args.iter()) {
                unify(arena, *x, *y)?;
            }
            Ok(())
        }
        (Type::Fun(af), Type::Fun(bf)) => {
            if af.from.len() != bf.from.len() {
                return Err(EngineError::ArityMismatch {
                    expected: af.from.len(),
                    found: bf.from.len(),
                });
            }
            for (x, y) in af.from.iter().zip(bf.from.iter()) {
                unify(arena, *x, *y)?;
            }
            unify(arena, af.to, bf.to)
        }
        _ => Err(EngineError::TypeMismatch {
            expected: arena.display(a),
            found: arena.display(b),
        }),
    }
}

/// Bind unresolved variable `v` to type `t`, after checking `t` doesn't
/// already contain `v` (which would make the resulting type infinite).
fn bind(arena: &mut TypeArena, v: TypeId, t: TypeId) -> Result<(), EngineError> {
    if v == t {
        return Ok(());
    }
    if occurs_in_type(arena, v, t) {
        return Err(EngineError::InfiniteType { var: arena.display(v), ty: arena.display(t) });
    }
    if let Type::Var(var) = arena.get_mut(v) {
        var.instance = Some(t);
    }
    Ok(())
}
