use aeg_core::ExtensionMacro;
use aeg_core::config::DEFAULT_CONFORMANCE;
use aeg_core::diagnostics::{Diagnostic, FixIt, FixItChange, MacroExpansionContext};
use aeg_core::error::MacroError;
use aeg_core::syntax::{
    AttributeSyntax, Decl, EnumDecl, ExtensionDecl, InheritanceClause, InheritedType,
    MemberBlockItem, Syntax, Token, Trivia, TypeSyntax,
};

use super::synthesize_for;
use crate::diagnostic::{AppEnumDiagnostic, FIX_IT_MESSAGE, fix_it_id};
use crate::synthesizer::{SynthesizedMembers, indent_step};
use crate::validate::validate_enum;

/// Marker the triggering attribute's `@` is rewritten to.
const DISABLED_AT_SIGN: &str = "//@";

/// `@AppEnumGenFixIt`: proposes rewriting the enum itself instead of adding an extension.
///
/// Never produces an extension. The rewritten enum travels as a `replaceEnum` warning
/// whose fix-it replaces the whole declaration.
pub struct AppEnumGenFixItMacro {
    conformance: String,
    insert_missing_inheritance: bool,
}

impl AppEnumGenFixItMacro {
    pub const NAME: &'static str = "AppEnumGenFixIt";

    pub fn new(conformance: &str, insert_missing_inheritance: bool) -> Self {
        Self {
            conformance: conformance.to_string(),
            insert_missing_inheritance,
        }
    }
}

impl Default for AppEnumGenFixItMacro {
    fn default() -> Self {
        Self::new(DEFAULT_CONFORMANCE, false)
    }
}

impl ExtensionMacro for AppEnumGenFixItMacro {
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
        _conforming_to: &[TypeSyntax],
        context: &mut dyn MacroExpansionContext,
    ) -> Result<Vec<ExtensionDecl>, MacroError> {
        let Some(enum_decl) = validate_enum(node, declaration, context) else {
            return Ok(Vec::new());
        };

        let mut replacement = enum_decl.clone();
        disable_attribute(&mut replacement, node);

        let needs_conformance = replacement
            .inheritance_clause
            .as_ref()
            .is_some_and(|clause| !clause.contains(&self.conformance));
        if needs_conformance {
            let Some(updated) =
                updated_inheritances(replacement.inheritance_clause.as_ref(), &self.conformance)?
            else {
                context.diagnose(Diagnostic::new(
                    node,
                    &AppEnumDiagnostic::UpdatedInheritancesIsNil,
                ));
                return Ok(Vec::new());
            };
            if let Some(clause) = replacement.inheritance_clause.as_mut() {
                clause.inherited_types = updated;
            }
        } else if replacement.inheritance_clause.is_none() && self.insert_missing_inheritance {
            insert_inheritance_clause(&mut replacement, &self.conformance)?;
        }

        rebuild_members(&mut replacement, enum_decl)?;

        log::debug!("suggesting replacement for enum {}", enum_decl.name.text);
        let fix_it = FixIt {
            message: FIX_IT_MESSAGE.to_string(),
            id: fix_it_id(),
            changes: vec![FixItChange::Replace {
                old: Box::new(declaration.clone()),
                new: Box::new(Decl::Enum(replacement)),
            }],
        };
        context.diagnose(Diagnostic::new(node, &AppEnumDiagnostic::ReplaceEnum).with_fix_it(fix_it));
        Ok(Vec::new())
    }
}

/// Turn the triggering attribute into a `//@Name` line comment.
///
/// Other attributes stay. A token following on the same line is moved to the next line so
/// the comment does not swallow it.
fn disable_attribute(enum_decl: &mut EnumDecl, node: &AttributeSyntax) {
    let Some(index) = enum_decl
        .attributes
        .iter()
        .position(|attribute| attribute == node)
        .or_else(|| {
            enum_decl
                .attributes
                .iter()
                .position(|attribute| attribute.name_text() == node.name_text())
        })
    else {
        log::warn!("@{} not found on the enum; left enabled", node.name_text());
        return;
    };

    let attribute = &mut enum_decl.attributes[index];
    attribute.at_sign.text = DISABLED_AT_SIGN.to_string();
    let trailing = attribute.trailing_trivia().trimmed_trailing_whitespace();
    attribute.set_trailing_trivia(trailing);
    let indent = attribute.leading_trivia().indentation().unwrap_or_default();

    let next_position: usize = enum_decl.attributes[..=index]
        .iter()
        .map(|attribute| attribute.tokens().len())
        .sum();
    let mut position = 0;
    enum_decl.for_each_token_mut(&mut |token| {
        if position == next_position && !token.leading_trivia.has_newline() {
            token.leading_trivia = Trivia::newline_indent(&indent);
        }
        position += 1;
    });
}

/// Existing entries, each ending in a comma, followed by ` <conformance> `.
///
/// `None` when there is no clause to update.
fn updated_inheritances(
    clause: Option<&InheritanceClause>,
    conformance: &str,
) -> Result<Option<Vec<InheritedType>>, MacroError> {
    let Some(clause) = clause else {
        return Ok(None);
    };
    let mut updated: Vec<InheritedType> = clause
        .inherited_types
        .iter()
        .map(|inherited| {
            if inherited.trailing_comma.is_some() {
                return inherited.clone();
            }
            let mut ty = inherited.ty.clone();
            ty.set_trailing_trivia(Trivia::new());
            InheritedType {
                ty,
                trailing_comma: Some(Token::comma()),
            }
        })
        .collect();
    updated.push(InheritedType {
        ty: TypeSyntax::Identifier(
            Token::identifier(conformance)?
                .with_leading_trivia(Trivia::space())
                .spaced(),
        ),
        trailing_comma: None,
    });
    Ok(Some(updated))
}

/// Add `: <conformance>` right after the enum name (or its generic parameters).
fn insert_inheritance_clause(enum_decl: &mut EnumDecl, conformance: &str) -> Result<(), MacroError> {
    let entry = TypeSyntax::Identifier(Token::identifier(conformance)?.spaced());
    enum_decl.header_end_mut().trailing_trivia = Trivia::new();
    enum_decl.inheritance_clause = Some(InheritanceClause {
        colon: Token::colon().spaced(),
        inherited_types: vec![InheritedType {
            ty: entry,
            trailing_comma: None,
        }],
    });
    Ok(())
}

/// Keep only `case` members and append freshly synthesized display members.
fn rebuild_members(replacement: &mut EnumDecl, original: &EnumDecl) -> Result<(), MacroError> {
    let decl_indent = original.leading_trivia().indentation().unwrap_or_default();
    let member_indent = original
        .member_block
        .members
        .first()
        .and_then(|member| member.leading_trivia().indentation())
        .unwrap_or_else(|| format!("{decl_indent}{}", indent_step(&decl_indent)));

    let SynthesizedMembers {
        type_display,
        case_display,
    } = synthesize_for(original, &member_indent)?;

    let block = &mut replacement.member_block;
    block.members.retain(|member| member.decl.is_enum_case());
    if let Some(last) = block.members.last_mut() {
        let trailing = last.trailing_trivia().trimmed_trailing_whitespace();
        last.set_trailing_trivia(trailing);
    }
    for member in [type_display, case_display] {
        let mut member = Decl::Variable(member);
        member.set_leading_trivia(Trivia::newlines_indent(2, &member_indent));
        block.members.push(MemberBlockItem::new(member));
    }
    if !block.right_brace.leading_trivia.has_newline() {
        block.right_brace.leading_trivia = Trivia::newline_indent(&decl_indent);
    }
    Ok(())
}
