//! The surface form: a small tree shape for host-supplied syntax.
//!
//! The core engine never reads raw characters — `parser::parse` and
//! `type_parser::parse_type` both consume an already-tree-structured
//! [`SurfaceForm`], already handed in by the host as parsed forms.
//! [`read_all`] and [`print`] are ambient test/embedding
//! tooling: a minimal reader and printer for a whitespace-and-parens
//! syntax, useful for writing tests and for hosts that don't already have
//! their own tree-builder.

use crate::prelude::*;
use core::fmt;

/// A parsed (but not yet interpreted) piece of host syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceForm {
    Int(i64),
    Symbol(String),
    /// The empty list / null atom, e.g. `()`.
    Nil,
    List(Vec<SurfaceForm>),
}

impl SurfaceForm {
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            SurfaceForm::Symbol(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SurfaceForm]> {
        match self {
            SurfaceForm::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Errors produced by [`read_all`]. Kept separate from [`crate::errors::EngineError`]
/// since the reader is ambient tooling, not one of the core components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    UnbalancedParens,
    UnexpectedCloseParen,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::UnbalancedParens => write!(f, "unbalanced parentheses"),
            ReadError::UnexpectedCloseParen => write!(f, "unexpected ')'"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReadError {}

/// Read every top-level form out of `src`.
pub fn read_all(src: &str) -> Result<Vec<SurfaceForm>, ReadError> {
    let mut chars: Vec<char> = src.chars().collect();
    chars.push(' ');
    let mut pos = 0usize;
    let mut forms = Vec::new();
    loop {
        skip_whitespace(&chars, &mut pos);
        if pos >= chars.len() {
            break;
        }
        forms.push(read_form(&chars, &mut pos)?);
    }
    Ok(forms)
}

fn skip_whitespace(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

fn read_form(chars: &[char], pos: &mut usize) -> Result<SurfaceForm, ReadError> {
    skip_whitespace(chars, pos);
    match chars.get(*pos) {
        None => Err(ReadError::UnbalancedParens),
        Some(')') => Err(ReadError::UnexpectedCloseParen),
        Some('(') => {
            *pos += 1;
            let mut items = Vec::new();
            loop {
                skip_whitespace(chars, pos);
                match chars.get(*pos) {
                    None => return Err(ReadError::UnbalancedParens),
                    Some(')') => {
                        *pos += 1;
                        break;
                    }
                    _ => items.push(read_form(chars, pos)?),
                }
            }
            if items.is_empty() {
                Ok(SurfaceForm::Nil)
            } else {
                Ok(SurfaceForm::List(items))
            }
        }
        _ => Ok(read_atom(chars, pos)),
    }
}

fn read_atom(chars: &[char], pos: &mut usize) -> SurfaceForm {
    let start = *pos;
    while *pos < chars.len() && !chars[*pos].is_whitespace() && chars[*pos] != '(' && chars[*pos] != ')' {
        *pos += 1;
    }
    let text: String = chars[start..*pos].iter().collect();
    if let Ok(n) = text.parse::<i64>() {
        SurfaceForm::Int(n)
    } else {
        SurfaceForm::Symbol(text)
    }
}

/// Print a [`SurfaceForm`] back to the same syntax [`read_all`] accepts.
pub fn print(form: &SurfaceForm) -> String {
    match form {
        SurfaceForm::Int(n) => n.to_string(),
        SurfaceForm::Symbol(s) => s.clone(),
        SurfaceForm::Nil => "()".to_string(),
        SurfaceForm::List(items) => {
            let inner: Vec<String> = items.iter().map(print).collect();
            format!("({})", inner.join(" "))
        }
    }
}
