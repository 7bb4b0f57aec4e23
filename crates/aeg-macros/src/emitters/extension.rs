use aeg_core::ExtensionMacro;
use aeg_core::config::DEFAULT_CONFORMANCE;
use aeg_core::diagnostics::MacroExpansionContext;
use aeg_core::error::MacroError;
use aeg_core::syntax::{
    AttributeSyntax, Decl, EnumDecl, ExtensionDecl, InheritanceClause, InheritedType, MemberBlock,
    MemberBlockItem, Syntax, Token, Trivia, TypeSyntax,
};

use super::synthesize_for;
use crate::synthesizer::{INDENT_UNIT, SynthesizedMembers};
use crate::validate::validate_enum;

/// `@AppEnumGen`: adds `extension <Enum>: AppEnum { ... }` next to the enum.
///
/// The enum itself is left untouched.
pub struct AppEnumGenMacro {
    conformance: String,
}

impl AppEnumGenMacro {
    pub const NAME: &'static str = "AppEnumGen";

    pub fn new(conformance: &str) -> Self {
        Self {
            conformance: conformance.to_string(),
        }
    }
}

impl Default for AppEnumGenMacro {
    fn default() -> Self {
        Self::new(DEFAULT_CONFORMANCE)
    }
}

impl ExtensionMacro for AppEnumGenMacro {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn conformance(&self) -> &str {
        &self.conformance
    }

    fn expansion(
        &self,
        node: &AttributeSyntax,
        declaration: &Decl,
        conforming_to: &[TypeSyntax],
        context: &mut dyn MacroExpansionContext,
    ) -> Result<Vec<ExtensionDecl>, MacroError> {
        let Some(enum_decl) = validate_enum(node, declaration, context) else {
            return Ok(Vec::new());
        };
        if conforming_to.is_empty() {
            log::debug!(
                "{} already declares {}; extension still added",
                enum_decl.name.text,
                self.conformance
            );
        }
        let extension = build_extension(enum_decl, &self.conformance)?;
        Ok(vec![extension])
    }
}

/// `extension <Enum>: <Conformance> {` with both members, one blank line apart.
fn build_extension(enum_decl: &EnumDecl, conformance: &str) -> Result<ExtensionDecl, MacroError> {
    let SynthesizedMembers {
        type_display,
        case_display,
    } = synthesize_for(enum_decl, INDENT_UNIT)?;

    let mut type_display = Decl::Variable(type_display);
    type_display.set_leading_trivia(Trivia::newline_indent(INDENT_UNIT));
    let mut case_display = Decl::Variable(case_display);
    case_display.set_leading_trivia(Trivia::newlines_indent(2, INDENT_UNIT));

    Ok(ExtensionDecl {
        attributes: Vec::new(),
        modifiers: Vec::new(),
        extension_keyword: Token::keyword("extension").spaced(),
        extended_type: TypeSyntax::Identifier(Token::identifier(&enum_decl.name.text)?),
        inheritance_clause: Some(InheritanceClause {
            colon: Token::colon().spaced(),
            inherited_types: vec![InheritedType {
                ty: TypeSyntax::Identifier(Token::identifier(conformance)?.spaced()),
                trailing_comma: None,
            }],
        }),
        generic_where_clause: None,
        member_block: MemberBlock {
            left_brace: Token::left_brace(),
            members: vec![
                MemberBlockItem::new(type_display),
                MemberBlockItem::new(case_display),
            ],
            right_brace: Token::right_brace().with_leading_trivia(Trivia::newlines(1)),
        },
    })
}
