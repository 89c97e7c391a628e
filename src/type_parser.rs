//! The type parser: surface syntax for type expressions to `TypeId`s.
//!
//! Type expressions use the same s-expression shapes as value
//! expressions: a bare symbol names a type variable or nullary
//! constructor, `(Con arg...)` applies a constructor, and `(-> a... r)`
//! builds a function type.

use crate::errors::EngineError;
use crate::prelude::*;
use crate::surface::SurfaceForm;
use crate::tycon::TyCon;
use crate::types::{TypeArena, TypeId};

/// Extra context a caller seeds before parsing: type constructors not yet
/// committed to the environment (so a `define-type` can refer to itself
/// recursively while it's still being processed) and a variable map,
/// shared across an entire `define-type`'s constructors so every mention
/// of the same variable name resolves to the same `TypeId`.
#[derive(Debug, Default)]
pub struct TypeParseContext {
    pub extra_tycons: BTreeMap<String, usize>,
    pub vars: BTreeMap<String, TypeId>,
}

/// Parse a surface form as a type expression. Takes the constructor
/// table and the arena as separate borrows (rather than one
/// `&Environment`) so a caller can hold `&env.tycons` and `&mut
/// env.arena` at once without conflict.
///
/// - A symbol starting with a lowercase letter is a type variable: the
///   first mention of a given name allocates a fresh variable, recorded
///   in `ctx.vars`; later mentions reuse it.
/// - Any other symbol is a nullary type-constructor reference, resolved
///   against `tycons` then `ctx.extra_tycons`.
/// - `(-> params result)` is a function type, where `params` is `()` for
///   zero arguments, a bare type for one, or a list of types for more
///   than one.
/// - `(Con arg...)` applies a known constructor of matching arity.
pub fn parse_type(
    form: &SurfaceForm,
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
    ctx: &mut TypeParseContext,
) -> Result<TypeId, EngineError> {
    match form {
        SurfaceForm::Int(_) => Err(EngineError::ParseError {
            reason: "a type expression cannot be an integer".to_string(),
        }),
        SurfaceForm::Nil => {
            Err(EngineError::ParseError { reason: "unexpected `()` in type position".to_string() })
        }
        SurfaceForm::Symbol(name) => parse_symbol_type(name, tycons, arena, ctx),
        SurfaceForm::List(items) => parse_list_type(items, tycons, arena, ctx),
    }
}

fn parse_symbol_type(
    name: &str,
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
    ctx: &mut TypeParseContext,
) -> Result<TypeId, EngineError> {
    if is_variable_name(name) {
        if let Some(id) = ctx.vars.get(name) {
            return Ok(*id);
        }
        let id = arena.new_var();
        ctx.vars.insert(name.to_string(), id);
        return Ok(id);
    }
    let arity = lookup_arity(name, tycons, ctx)?;
    if arity != 0 {
        return Err(EngineError::TyConArity { name: name.to_string(), expected: arity, found: 0 });
    }
    Ok(arena.new_const(name))
}

fn parse_list_type(
    items: &[SurfaceForm],
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
    ctx: &mut TypeParseContext,
) -> Result<TypeId, EngineError> {
    let Some(head) = items.first() else {
        return Err(EngineError::ParseError { reason: "empty type application".to_string() });
    };
    let Some(head_name) = head.as_symbol() else {
        return Err(EngineError::ParseError {
            reason: "a type application's head must be a symbol".to_string(),
        });
    };

    if head_name == "->" {
        if items.len() != 3 {
            return Err(EngineError::ParseError {
                reason: "`->` takes exactly a parameter list and a result type".to_string(),
            });
        }
        let from = match &items[1] {
            SurfaceForm::Nil => Vec::new(),
            SurfaceForm::List(params) => params
                .iter()
                .map(|p| parse_type(p, tycons, arena, ctx))
                .collect::<Result<Vec<_>, _>>()?,
            single => vec![parse_type(single, tycons, arena, ctx)?],
        };
        let to = parse_type(&items[2], tycons, arena, ctx)?;
        return Ok(arena.new_fun(from, to));
    }

    let arity = lookup_arity(head_name, tycons, ctx)?;
    let found = items.len() - 1;
    if arity != found {
        return Err(EngineError::TyConArity { name: head_name.to_string(), expected: arity, found });
    }
    let args = items[1..]
        .iter()
        .map(|a| parse_type(a, tycons, arena, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(arena.new_app(head_name, args))
}

fn is_variable_name(name: &str) -> bool {
    name.chars().next().map(|c| c.is_lowercase()).unwrap_or(false)
}

fn lookup_arity(
    name: &str,
    tycons: &BTreeMap<String, TyCon>,
    ctx: &TypeParseContext,
) -> Result<usize, EngineError> {
    if let Some(tc) = tycons.get(name) {
        return Ok(tc.arity);
    }
    if let Some(arity) = ctx.extra_tycons.get(name) {
        return Ok(*arity);
    }
    Err(EngineError::UnknownTyCon { name: name.to_string() })
}
