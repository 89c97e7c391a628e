//! The host macro-expansion hook.
//!
//! Macro expansion is an injected trait rather than a built-in pass, so
//! the core has no direct dependency on any particular host macro
//! system and can be unit-tested with a trivial identity expander.

use crate::surface::SurfaceForm;

/// Given a list-form whose head the parser doesn't itself recognise,
/// decide whether the host treats it as a macro and, if so, expand it
/// into a form the parser does understand.
pub trait MacroExpander {
    fn is_macro(&self, head: &str) -> bool;
    /// Expand `form`. Only called when `is_macro` returned `true` for its
    /// head; may be called repeatedly until the result is no longer a
    /// macro invocation.
    fn expand(&self, form: &SurfaceForm) -> SurfaceForm;
}

/// A `MacroExpander` that registers no macros at all.
pub struct IdentityExpander;

impl MacroExpander for IdentityExpander {
    fn is_macro(&self, _head: &str) -> bool {
        false
    }

    fn expand(&self, form: &SurfaceForm) -> SurfaceForm {
        form.clone()
    }
}
