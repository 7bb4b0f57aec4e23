use aeg_core::diagnostics::{Diagnostic, MacroExpansionContext};
use aeg_core::syntax::{AttributeSyntax, Decl, EnumDecl};

use crate::diagnostic::AppEnumDiagnostic;

/// Downcast the attached declaration to an enum.
///
/// Reports `notAnEnum` at the attribute and returns `None` for any other declaration kind.
pub fn validate_enum<'a>(
    node: &AttributeSyntax,
    declaration: &'a Decl,
    context: &mut dyn MacroExpansionContext,
) -> Option<&'a EnumDecl> {
    let enum_decl = declaration.as_enum();
    if enum_decl.is_none() {
        log::debug!(
            "@{} attached to a {}, not an enum",
            node.name_text(),
            declaration.kind_name()
        );
        context.diagnose(Diagnostic::new(node, &AppEnumDiagnostic::NotAnEnum));
    }
    enum_decl
}
