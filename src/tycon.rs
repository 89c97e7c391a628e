//! Type constructors and their data constructors.
//!
//! A constructor record tracks an immutable name and arity, plus a list
//! of data constructors that's filled in once the constructor's
//! `define-type` form has been fully processed.

use crate::prelude::*;

/// A declared type constructor, e.g. `Int` (arity 0) or `Maybe` (arity 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyCon {
    pub name: String,
    pub arity: usize,
    pub data_constructors: Vec<DataCtor>,
}

impl TyCon {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        TyCon { name: name.into(), arity, data_constructors: Vec::new() }
    }
}

/// One data constructor of a type, e.g. `Just`/`Nothing` for `Maybe`. Its
/// full function type (fields -> owning type) is registered separately in
/// `Environment`'s term table under `name`; this record only tracks the
/// bookkeeping `define-type` needs to describe the constructor back to a
/// caller. `predicate_name` is the accompanying membership-recognizer
/// `define-type` also introduces, named by appending `-P` to the
/// constructor's own name (case preserved, so `Just` gets `Just-P`
/// rather than colliding with some unrelated lowercase user term).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCtor {
    pub name: String,
    pub field_count: usize,
    pub predicate_name: String,
}

impl DataCtor {
    pub fn new(name: impl Into<String>, field_count: usize) -> Self {
        let name = name.into();
        let predicate_name = format!("{}-P", name);
        DataCtor { name, field_count, predicate_name }
    }
}
