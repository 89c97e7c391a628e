//! Fresh instantiation: copy a type, replacing every generic variable
//! with a brand-new one, while leaving non-generic variables (those bound
//! by an enclosing lambda) untouched.
//!
//! The classic "non-generic variable list" style of Algorithm W:
//! instantiation walks a type against a non-generic set directly, with
//! no explicit `forall`-quantified scheme object.

use crate::prelude::*;
use crate::types::{Type, TypeArena, TypeId};
use crate::unify::{occurs_in_type, prune};

/// Copy `t`, replacing every variable not "pinned" by `non_generic` with
/// a fresh one. Two occurrences of the same generic variable in `t` map
/// to the same fresh variable in the copy.
pub fn fresh(arena: &mut TypeArena, t: TypeId, non_generic: &[TypeId]) -> TypeId {
    let mut mapping = BTreeMap::new();
    fresh_rec(arena, t, non_generic, &mut mapping)
}

fn fresh_rec(
    arena: &mut TypeArena,
    t: TypeId,
    non_generic: &[TypeId],
    mapping: &mut BTreeMap<TypeId, TypeId>,
) -> TypeId {
    let pruned = prune(arena, t);
    match arena.get(pruned).clone() {
        Type::Var(_) => {
            if is_generic(arena, pruned, non_generic) {
                *mapping.entry(pruned).or_insert_with(|| arena.new_var())
            } else {
                pruned
            }
        }
        Type::App(app) => {
            let args: Vec<TypeId> =
                app.args.iter().map(|a| fresh_rec(arena, *a, non_generic, mapping)).collect();
            arena.new_app(app.con, args)
        }
        Type::Fun(fun) => {
            let from: Vec<TypeId> =
                fun.from.iter().map(|a| fresh_rec(arena, *a, non_generic, mapping)).collect();
            let to = fresh_rec(arena, fun.to, non_generic, mapping);
            arena.new_fun(from, to)
        }
    }
}

/// A variable is generic (with respect to the current scope) exactly
/// when it isn't reachable from any non-generic variable — i.e. it
/// wasn't bound by an enclosing lambda parameter.
fn is_generic(arena: &mut TypeArena, v: TypeId, non_generic: &[TypeId]) -> bool {
    !non_generic.iter().any(|ng| occurs_in_type(arena, v, *ng))
}
