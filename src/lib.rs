//! # Typeforge
//!
//! A Hindley-Milner type-inference engine for a small, host-embeddable
//! expression language: literals, variables, lambdas, application,
//! `let`/`letrec`, `if`, sequencing, algebraic data types and a trusted
//! host-syntax escape hatch.
//!
//! Typeforge has no parser for raw text of its own syntax beyond a small
//! ambient s-expression reader (`surface::read_all`) meant for tests and
//! simple embedders: the core expects a host to hand in already
//! tree-structured [`surface::SurfaceForm`] values, and hands back a
//! [`elaborate::CodeDescriptor`] per top-level form for a downstream code
//! generator to consume. It does not itself evaluate or compile anything.
//!
//! ## Modules
//!
//! - [`types`]: the arena-backed `Type` representation (`Var`/`App`/`Fun`)
//! - [`tycon`]: type constructors and their data constructors
//! - [`env`]: the type environment (constructor table + term table)
//! - [`surface`]: the host-syntax tree type, plus a minimal reader
//! - [`type_parser`]: surface syntax for type expressions
//! - [`ast`]: the expression tree type inference walks
//! - [`macro_expand`]: the injected host macro-expansion hook
//! - [`parser`]: surface syntax for value expressions
//! - [`unify`]: `prune`/`occurs_in_type`/`unify`
//! - [`fresh`]: fresh instantiation against a non-generic variable set
//! - [`infer`]: the per-node type inference rules
//! - [`elaborate`]: the top-level elaborator and its code descriptors
//! - [`errors`]: the engine's error taxonomy

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
#[macro_use]
extern crate std as alloc;

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

mod prelude;

pub mod ast;
pub mod elaborate;
pub mod env;
pub mod errors;
pub mod fresh;
pub mod infer;
pub mod macro_expand;
pub mod parser;
pub mod surface;
pub mod type_parser;
pub mod tycon;
pub mod types;
pub mod unify;

pub use ast::{Node, NodeKind};
pub use elaborate::{CodeDescriptor, CtorDescriptor, Elaborator};
pub use env::Environment;
pub use errors::EngineError;
pub use infer::{infer, Scope};
pub use macro_expand::{IdentityExpander, MacroExpander};
pub use surface::SurfaceForm;
pub use types::{Type, TypeArena, TypeId};
