pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod parse;
pub mod syntax;

use diagnostics::MacroExpansionContext;
use error::MacroError;
use syntax::{AttributeSyntax, Decl, ExtensionDecl, TypeSyntax};

/// An attached macro that can add extensions to the declaration it is attached to.
///
/// Each call is an independent, pure transformation: `declaration` is read-only and the
/// returned nodes are freshly built. Diagnostics (and any suggested edits) go to `context`.
pub trait ExtensionMacro: Send + Sync {
    /// Name the macro is registered and attached under, e.g. `AppEnumGen`.
    fn name(&self) -> &str;

    /// Conformance the macro declares it provides.
    fn conformance(&self) -> &str;

    /// `conforming_to` lists the requested conformances the declaration does not already have.
    fn expansion(
        &self,
        node: &AttributeSyntax,
        declaration: &Decl,
        conforming_to: &[TypeSyntax],
        context: &mut dyn MacroExpansionContext,
    ) -> Result<Vec<ExtensionDecl>, MacroError>;
}
