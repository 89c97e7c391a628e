//! The top-level elaborator: `declare`, `define-type`, `define`, and the
//! `begin` grouping form.
//!
//! Shaped after a top-level driver that walks a program's forms in
//! order against one running environment, generalized here to these
//! four top-level forms.

use crate::ast::{Node, NodeKind};
use crate::env::Environment;
use crate::errors::EngineError;
use crate::infer::{infer, Scope};
use crate::macro_expand::MacroExpander;
use crate::parser::parse;
use crate::prelude::*;
use crate::surface::SurfaceForm;
use crate::tycon::DataCtor;
use crate::type_parser::{parse_type, TypeParseContext};
use crate::types::TypeId;

/// One data constructor as reported back to a downstream code generator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CtorDescriptor {
    pub name: String,
    pub ty: SurfaceForm,
}

/// The code-generation descriptor the elaborator produces for each
/// top-level form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CodeDescriptor {
    /// A `declare` form: no code, recorded purely so every top-level form
    /// maps to exactly one descriptor.
    Declare,
    DefineType { name: String, arity: usize, constructors: Vec<CtorDescriptor>, predicates: Vec<String> },
    /// First definition of `internal_name`.
    Define { internal_name: String, expr: Node, ty: SurfaceForm },
    /// A redefinition of `internal_name`.
    Assign { internal_name: String, expr: Node, ty: SurfaceForm },
}

/// Drives elaboration of a sequence of top-level forms against one
/// environment.
pub struct Elaborator<'a> {
    pub env: Environment,
    expander: &'a dyn MacroExpander,
}

impl<'a> Elaborator<'a> {
    pub fn new(env: Environment, expander: &'a dyn MacroExpander) -> Self {
        Elaborator { env, expander }
    }

    /// Elaborate one top-level form, returning the descriptor(s) it
    /// produces (`begin` may produce more than one, flattened from any
    /// nesting).
    pub fn elaborate_top(&mut self, form: &SurfaceForm) -> Result<Vec<CodeDescriptor>, EngineError> {
        let items = form.as_list().ok_or_else(|| EngineError::ParseError {
            reason: "a top-level form must be a list".to_string(),
        })?;
        let head = items.first().and_then(|f| f.as_symbol()).ok_or_else(|| EngineError::ParseError {
            reason: "a top-level form's head must be a symbol".to_string(),
        })?;
        match head {
            "declare" => self.elaborate_declare(items).map(|d| vec![d]),
            "define-type" => self.elaborate_define_type(items).map(|d| vec![d]),
            "define" => self.elaborate_define(items).map(|d| vec![d]),
            "begin" => self.elaborate_begin(items),
            other => Err(EngineError::ParseError { reason: format!("unknown top-level form `{}`", other) }),
        }
    }

    fn elaborate_begin(&mut self, items: &[SurfaceForm]) -> Result<Vec<CodeDescriptor>, EngineError> {
        let mut out = Vec::new();
        for sub in &items[1..] {
            out.extend(self.elaborate_top(sub)?);
        }
        Ok(out)
    }

    fn elaborate_declare(&mut self, items: &[SurfaceForm]) -> Result<CodeDescriptor, EngineError> {
        if items.len() != 3 {
            return Err(EngineError::ParseError {
                reason: "`declare` takes a name and a type".to_string(),
            });
        }
        let name = items[1].as_symbol().ok_or_else(|| EngineError::ParseError {
            reason: "`declare`'s first argument must be a symbol".to_string(),
        })?;
        let mut ctx = TypeParseContext::default();
        let ty = parse_type(&items[2], &self.env.tycons, &mut self.env.arena, &mut ctx)?;
        self.env.declare_term(name, ty);
        Ok(CodeDescriptor::Declare)
    }

    fn elaborate_define_type(&mut self, items: &[SurfaceForm]) -> Result<CodeDescriptor, EngineError> {
        if items.len() < 2 {
            return Err(EngineError::ParseError {
                reason: "`define-type` needs a type head".to_string(),
            });
        }
        let head_items = items[1].as_list().ok_or_else(|| EngineError::ParseError {
            reason: "`define-type`'s head must be `(Name var...)`".to_string(),
        })?;
        let (name_form, var_forms) =
            head_items.split_first().ok_or_else(|| EngineError::ParseError {
                reason: "`define-type`'s head must name a type".to_string(),
            })?;
        let name = name_form.as_symbol().ok_or_else(|| EngineError::ParseError {
            reason: "a type name must be a symbol".to_string(),
        })?;
        let var_names = var_forms
            .iter()
            .map(|f| {
                f.as_symbol().map(|s| s.to_string()).ok_or_else(|| EngineError::ParseError {
                    reason: "a type parameter must be a symbol".to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let arity = var_names.len();

        let mut ctx = TypeParseContext::default();
        ctx.extra_tycons.insert(name.to_string(), arity);
        let var_ids: Vec<TypeId> = var_names
            .iter()
            .map(|v| {
                let id = self.env.arena.new_var();
                ctx.vars.insert(v.clone(), id);
                id
            })
            .collect();
        let owner_ty = self.env.arena.new_app(name, var_ids);

        let mut ctor_descriptors = Vec::new();
        let mut data_ctors = Vec::new();
        let mut predicates = Vec::new();
        for ctor_form in &items[2..] {
            let ctor_items = ctor_form.as_list().ok_or_else(|| EngineError::ParseError {
                reason: "each data constructor must be a list".to_string(),
            })?;
            let (ctor_name_form, field_forms) =
                ctor_items.split_first().ok_or_else(|| EngineError::ParseError {
                    reason: "a data constructor needs a name".to_string(),
                })?;
            let ctor_name = ctor_name_form.as_symbol().ok_or_else(|| EngineError::ParseError {
                reason: "a data constructor's name must be a symbol".to_string(),
            })?;
            let field_tys = field_forms
                .iter()
                .map(|f| parse_type(f, &self.env.tycons, &mut self.env.arena, &mut ctx))
                .collect::<Result<Vec<_>, _>>()?;
            let field_count = field_tys.len();
            let ctor_ty = if field_tys.is_empty() {
                owner_ty
            } else {
                self.env.arena.new_fun(field_tys, owner_ty)
            };
            self.env.declare_term(ctor_name, ctor_ty);
            let printed_ty = self.env.arena.materialize(ctor_ty);
            let data_ctor = DataCtor::new(ctor_name, field_count);

            let bool_ty = self.env.arena.new_const("Bool");
            let pred_ty = self.env.arena.new_fun(vec![owner_ty], bool_ty);
            self.env.declare_term(data_ctor.predicate_name.clone(), pred_ty);

            predicates.push(data_ctor.predicate_name.clone());
            ctor_descriptors.push(CtorDescriptor { name: ctor_name.to_string(), ty: printed_ty });
            data_ctors.push(data_ctor);
        }

        if self.env.declare_tycon(name, arity).is_err() {
            log::warn!("type constructor `{}` redefined", name);
            self.env.redeclare_tycon(name, arity);
        }
        for ctor in data_ctors {
            self.env.add_data_constructor(name, ctor);
        }

        Ok(CodeDescriptor::DefineType {
            name: name.to_string(),
            arity,
            constructors: ctor_descriptors,
            predicates,
        })
    }

    fn elaborate_define(&mut self, items: &[SurfaceForm]) -> Result<CodeDescriptor, EngineError> {
        if items.len() != 3 {
            return Err(EngineError::ParseError {
                reason: "`define` takes a name (or signature) and a body".to_string(),
            });
        }
        let (name, mut node) = match &items[1] {
            SurfaceForm::Symbol(name) => {
                let node = parse(&items[2], self.expander, &self.env.tycons, &mut self.env.arena)?;
                (name.clone(), node)
            }
            SurfaceForm::List(sig_items) => {
                let (name_form, param_forms) =
                    sig_items.split_first().ok_or_else(|| EngineError::ParseError {
                        reason: "a function signature needs a name".to_string(),
                    })?;
                let name = name_form.as_symbol().ok_or_else(|| EngineError::ParseError {
                    reason: "a function name must be a symbol".to_string(),
                })?;
                let params = param_forms
                    .iter()
                    .map(|f| {
                        f.as_symbol().map(|s| s.to_string()).ok_or_else(|| EngineError::ParseError {
                            reason: "a function parameter must be a symbol".to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let body = parse(&items[2], self.expander, &self.env.tycons, &mut self.env.arena)?;
                // (define (f p...) body) => (letrec ((f (fn (p...) body))) f),
                // so a recursive call to f inside body resolves.
                let abstraction = Node::new(NodeKind::Abstraction { params, body: Box::new(body) });
                let letrec = Node::new(NodeKind::Letrec {
                    bindings: vec![(name.to_string(), abstraction)],
                    body: Box::new(Node::new(NodeKind::Variable(name.to_string()))),
                });
                (name.to_string(), letrec)
            }
            _ => {
                return Err(EngineError::ParseError {
                    reason: "`define`'s first argument must be a symbol or a signature".to_string(),
                })
            }
        };

        let mut scope = Scope::new();
        let mut non_generic = Vec::new();
        let derived_ty = infer(&mut node, &mut self.env, &mut scope, &mut non_generic)?;

        if let Some(declared) = self.env.lookup_term(&name).and_then(|info| info.declared_type) {
            crate::unify::unify(&mut self.env.arena, declared, derived_ty)?;
        }

        let printed_ty = self.env.arena.materialize(derived_ty);
        let already_defined = self.env.define_term(name.clone(), node.clone(), derived_ty);
        if already_defined {
            log::warn!("`{}` redefined", name);
            Ok(CodeDescriptor::Assign { internal_name: name, expr: node, ty: printed_ty })
        } else {
            Ok(CodeDescriptor::Define { internal_name: name, expr: node, ty: printed_ty })
        }
    }
}
