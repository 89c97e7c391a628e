//! The value parser: surface syntax for expressions to [`Node`]s.
//!
//! A recursive-descent structure walking an already-tree-structured
//! [`SurfaceForm`] input instead of a token stream: the core never reads
//! raw text itself.

use crate::ast::{Node, NodeKind};
use crate::errors::EngineError;
use crate::macro_expand::MacroExpander;
use crate::prelude::*;
use crate::surface::SurfaceForm;
use crate::tycon::TyCon;
use crate::type_parser::{parse_type, TypeParseContext};
use crate::types::TypeArena;

/// Parse one surface form as a value expression.
///
/// Recognised list heads: `fn`, `let`, `letrec`, `if`, `lisp`, `progn`.
/// Any other list is an application of its head to its tail, unless
/// `expander` reports the head as a macro, in which case the form is
/// expanded (repeatedly, until the head is no longer a macro) before
/// being parsed.
pub fn parse(
    form: &SurfaceForm,
    expander: &dyn MacroExpander,
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
) -> Result<Node, EngineError> {
    match form {
        SurfaceForm::Int(n) => Ok(Node::new(NodeKind::Literal(*n))),
        SurfaceForm::Symbol(name) => Ok(Node::new(NodeKind::Variable(name.clone()))),
        SurfaceForm::Nil => {
            Err(EngineError::ParseError { reason: "a null atom is not a value expression".to_string() })
        }
        SurfaceForm::List(items) => parse_list(form, items, expander, tycons, arena),
    }
}

fn parse_list(
    whole_form: &SurfaceForm,
    items: &[SurfaceForm],
    expander: &dyn MacroExpander,
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
) -> Result<Node, EngineError> {
    let Some(head) = items.first() else {
        return Err(EngineError::ParseError { reason: "`()` is not a value expression".to_string() });
    };

    if let Some(head_name) = head.as_symbol() {
        if expander.is_macro(head_name) {
            let expanded = expander.expand(whole_form);
            return parse(&expanded, expander, tycons, arena);
        }
        match head_name {
            "fn" => return parse_fn(items, expander, tycons, arena),
            "let" => return parse_let(items, expander, tycons, arena, false),
            "letrec" => return parse_let(items, expander, tycons, arena, true),
            "if" => return parse_if(items, expander, tycons, arena),
            "lisp" => return parse_lisp(items, tycons, arena),
            "progn" => return parse_progn(items, expander, tycons, arena),
            _ => {}
        }
    }

    let rator = parse(head, expander, tycons, arena)?;
    let rands = items[1..]
        .iter()
        .map(|f| parse(f, expander, tycons, arena))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::new(NodeKind::Application { rator: Box::new(rator), rands }))
}

fn parse_fn(
    items: &[SurfaceForm],
    expander: &dyn MacroExpander,
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
) -> Result<Node, EngineError> {
    if items.len() != 3 {
        return Err(EngineError::ParseError {
            reason: "`fn` takes a parameter list and a body".to_string(),
        });
    }
    let params = parse_symbol_list(&items[1], "fn's parameter list")?;
    let body = parse(&items[2], expander, tycons, arena)?;
    Ok(Node::new(NodeKind::Abstraction { params, body: Box::new(body) }))
}

fn parse_let(
    items: &[SurfaceForm],
    expander: &dyn MacroExpander,
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
    recursive: bool,
) -> Result<Node, EngineError> {
    let head_name = if recursive { "letrec" } else { "let" };
    if items.len() != 3 {
        return Err(EngineError::ParseError {
            reason: format!("`{}` takes a binding list and a body", head_name),
        });
    }
    let Some(binding_forms) = items[1].as_list() else {
        return Err(EngineError::ParseError {
            reason: format!("`{}`'s bindings must be a list", head_name),
        });
    };
    let mut bindings = Vec::with_capacity(binding_forms.len());
    for binding in binding_forms {
        let Some(pair) = binding.as_list() else {
            return Err(EngineError::ParseError {
                reason: format!("each `{}` binding must be a `(name value)` pair", head_name),
            });
        };
        if pair.len() != 2 {
            return Err(EngineError::ParseError {
                reason: format!("each `{}` binding must be a `(name value)` pair", head_name),
            });
        }
        let Some(name) = pair[0].as_symbol() else {
            return Err(EngineError::ParseError { reason: "a binding name must be a symbol".to_string() });
        };
        let value = parse(&pair[1], expander, tycons, arena)?;
        bindings.push((name.to_string(), value));
    }
    let body = parse(&items[2], expander, tycons, arena)?;
    let kind = if recursive {
        NodeKind::Letrec { bindings, body: Box::new(body) }
    } else {
        NodeKind::Let { bindings, body: Box::new(body) }
    };
    Ok(Node::new(kind))
}

fn parse_if(
    items: &[SurfaceForm],
    expander: &dyn MacroExpander,
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
) -> Result<Node, EngineError> {
    if items.len() != 4 {
        return Err(EngineError::ParseError {
            reason: "`if` takes a condition, a then-branch and an else-branch".to_string(),
        });
    }
    let cond = parse(&items[1], expander, tycons, arena)?;
    let then_branch = parse(&items[2], expander, tycons, arena)?;
    let else_branch = parse(&items[3], expander, tycons, arena)?;
    Ok(Node::new(NodeKind::If {
        cond: Box::new(cond),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
    }))
}

fn parse_lisp(
    items: &[SurfaceForm],
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
) -> Result<Node, EngineError> {
    if items.len() != 3 {
        return Err(EngineError::ParseError {
            reason: "`lisp` takes a type annotation and a host form".to_string(),
        });
    }
    let mut ctx = TypeParseContext::default();
    let annotated_ty = parse_type(&items[1], tycons, arena, &mut ctx)?;
    Ok(Node::new(NodeKind::HostEscape { annotated_ty, raw: items[2].clone() }))
}

/// `(progn)` with no body expressions is allowed: it lowers to an empty
/// `Sequence`, which `infer` types as `Unit`.
fn parse_progn(
    items: &[SurfaceForm],
    expander: &dyn MacroExpander,
    tycons: &BTreeMap<String, TyCon>,
    arena: &mut TypeArena,
) -> Result<Node, EngineError> {
    let exprs =
        items[1..].iter().map(|f| parse(f, expander, tycons, arena)).collect::<Result<Vec<_>, _>>()?;
    Ok(Node::new(NodeKind::Sequence(exprs)))
}

fn parse_symbol_list(form: &SurfaceForm, what: &str) -> Result<Vec<String>, EngineError> {
    match form {
        SurfaceForm::Nil => Ok(Vec::new()),
        SurfaceForm::List(items) => items
            .iter()
            .map(|f| {
                f.as_symbol()
                    .map(|s| s.to_string())
                    .ok_or_else(|| EngineError::ParseError { reason: format!("{} must be symbols", what) })
            })
            .collect(),
        _ => Err(EngineError::ParseError { reason: format!("{} must be a list", what) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::macro_expand::IdentityExpander;
    use crate::surface::read_all;

    fn parse_src(src: &str) -> Result<Node, EngineError> {
        let mut env = Environment::with_builtins();
        let forms = read_all(src).unwrap();
        parse(&forms[0], &IdentityExpander, &env.tycons, &mut env.arena)
    }

    #[test]
    fn parses_identity_lambda() {
        let node = parse_src("(fn (x) x)").unwrap();
        assert!(matches!(node.kind, NodeKind::Abstraction { .. }));
    }

    #[test]
    fn parses_application() {
        let node = parse_src("(f 1 2)").unwrap();
        match node.kind {
            NodeKind::Application { rands, .. } => assert_eq!(rands.len(), 2),
            _ => panic!("expected an application"),
        }
    }

    #[test]
    fn parses_nullary_function() {
        let node = parse_src("(fn () 1)").unwrap();
        match node.kind {
            NodeKind::Abstraction { params, .. } => assert!(params.is_empty()),
            _ => panic!("expected an abstraction"),
        }
    }

    #[test]
    fn null_atom_is_a_parse_error() {
        let err = parse_src("()").unwrap_err();
        assert!(matches!(err, EngineError::ParseError { .. }));
    }

    #[test]
    fn lisp_escape_carries_its_annotated_type() {
        let node = parse_src("(lisp Int (raw-host-form))").unwrap();
        assert!(matches!(node.kind, NodeKind::HostEscape { .. }));
    }

    #[test]
    fn empty_progn_is_an_empty_sequence() {
        let node = parse_src("(progn)").unwrap();
        match node.kind {
            NodeKind::Sequence(exprs) => assert!(exprs.is_empty()),
            _ => panic!("expected a sequence"),
        }
    }
}
