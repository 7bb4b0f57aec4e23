use aeg_core::error::MacroError;
use aeg_core::syntax::{
    DeclModifier, DictionaryContent, DictionaryElement, DictionaryExpr, DictionaryType, ExprSyntax,
    InitializerClause, MemberAccessExpr, Token, Trivia, TypeAnnotation, TypeSyntax, VariableDecl,
};

use crate::case_extractor::CaseEntry;

pub const TYPE_DISPLAY_REPRESENTATION: &str = "typeDisplayRepresentation";
pub const CASE_DISPLAY_REPRESENTATIONS: &str = "caseDisplayRepresentations";

/// One indentation level of generated code.
pub const INDENT_UNIT: &str = "    ";

/// One indentation level in the style of `indent`: a tab for tab-indented code.
pub fn indent_step(indent: &str) -> &'static str {
    if indent.contains('\t') { "\t" } else { INDENT_UNIT }
}

/// The two members that make an enum conform to `AppEnum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedMembers {
    /// `static var typeDisplayRepresentation: TypeDisplayRepresentation = "<Enum>"`
    pub type_display: VariableDecl,
    /// `static var caseDisplayRepresentations: [<Enum>: DisplayRepresentation] = [...]`
    pub case_display: VariableDecl,
}

/// Build both members for `enum_name` and its cases.
///
/// `indent` is the indentation the members will be placed at; mapping entries go one level
/// deeper, one line per `case` declaration. Neither member has leading trivia.
pub fn synthesize(
    enum_name: &Token,
    cases: &[CaseEntry],
    indent: &str,
) -> Result<SynthesizedMembers, MacroError> {
    log::debug!(
        "synthesizing display representations for {} ({} cases)",
        enum_name.text,
        cases.len()
    );
    Ok(SynthesizedMembers {
        type_display: type_display_representation(enum_name)?,
        case_display: case_display_representations(enum_name, cases, indent)?,
    })
}

fn type_display_representation(enum_name: &Token) -> Result<VariableDecl, MacroError> {
    static_var(
        TYPE_DISPLAY_REPRESENTATION,
        TypeSyntax::Identifier(Token::identifier("TypeDisplayRepresentation")?.spaced()),
        ExprSyntax::StringLiteral(Token::string_literal(enum_name.identifier_text())),
    )
}

fn case_display_representations(
    enum_name: &Token,
    cases: &[CaseEntry],
    indent: &str,
) -> Result<VariableDecl, MacroError> {
    let mapping_type = TypeSyntax::Dictionary(DictionaryType {
        left_square: Token::left_square(),
        key: Box::new(TypeSyntax::Identifier(Token::identifier(&enum_name.text)?)),
        colon: Token::colon().spaced(),
        value: Box::new(TypeSyntax::Identifier(Token::identifier(
            "DisplayRepresentation",
        )?)),
        right_square: Token::right_square().spaced(),
    });
    static_var(
        CASE_DISPLAY_REPRESENTATIONS,
        mapping_type,
        ExprSyntax::Dictionary(mapping_literal(cases, indent)?),
    )
}

/// `[.a: "a", .b: "b",\n .c: "c"\n]`, or `[:]` without cases.
fn mapping_literal(cases: &[CaseEntry], indent: &str) -> Result<DictionaryExpr, MacroError> {
    if cases.is_empty() {
        return Ok(DictionaryExpr {
            left_square: Token::left_square(),
            content: DictionaryContent::Empty {
                colon: Token::colon(),
            },
            right_square: Token::right_square(),
        });
    }

    let entry_indent = format!("{indent}{}", indent_step(indent));
    let mut elements = Vec::with_capacity(cases.len());
    for (position, entry) in cases.iter().enumerate() {
        let starts_line = position == 0
            || cases[position - 1].declaration_index != entry.declaration_index;
        let period = if starts_line {
            Token::period().with_leading_trivia(Trivia::newline_indent(&entry_indent))
        } else {
            Token::period()
        };
        let trailing_comma = cases.get(position + 1).map(|next| {
            if next.declaration_index == entry.declaration_index {
                Token::comma().spaced()
            } else {
                Token::comma()
            }
        });
        elements.push(DictionaryElement {
            key: ExprSyntax::MemberAccess(MemberAccessExpr {
                period,
                name: Token::identifier(&entry.name.text)?,
            }),
            colon: Token::colon().spaced(),
            value: ExprSyntax::StringLiteral(Token::string_literal(entry.label())),
            trailing_comma,
        });
    }

    Ok(DictionaryExpr {
        left_square: Token::left_square(),
        content: DictionaryContent::Elements(elements),
        right_square: Token::right_square().with_leading_trivia(Trivia::newline_indent(indent)),
    })
}

/// `static var <name>: <ty> = <value>`; `ty` carries the space before `=`.
fn static_var(name: &str, ty: TypeSyntax, value: ExprSyntax) -> Result<VariableDecl, MacroError> {
    Ok(VariableDecl {
        attributes: Vec::new(),
        modifiers: vec![DeclModifier::new(Token::keyword("static").spaced())],
        binding_specifier: Token::keyword("var").spaced(),
        pattern: Token::identifier(name)?,
        type_annotation: Some(TypeAnnotation {
            colon: Token::colon().spaced(),
            ty,
        }),
        initializer: Some(InitializerClause {
            equal: Token::equal().spaced(),
            value,
        }),
        accessor_block: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeg_core::parse::parse_decl;
    use aeg_core::syntax::{Decl, Syntax};

    use crate::case_extractor::extract_cases;

    fn members_for(source: &str, indent: &str) -> SynthesizedMembers {
        let decl = parse_decl(source).unwrap();
        let enum_decl = decl.as_enum().unwrap();
        let cases = extract_cases(&enum_decl.member_block);
        synthesize(&enum_decl.name, &cases, indent).unwrap()
    }

    #[test]
    fn test_type_display_uses_enum_name_verbatim() {
        let members = members_for("enum WeekDay { case monday }", "");
        assert_eq!(
            members.type_display.to_source(),
            r#"static var typeDisplayRepresentation: TypeDisplayRepresentation = "WeekDay""#
        );
        assert!(members.type_display.is_static());
        assert_eq!(members.type_display.name(), TYPE_DISPLAY_REPRESENTATION);
    }

    #[test]
    fn test_mapping_one_line_per_case_declaration() {
        let members = members_for("enum A {\n    case a, b\n    case c\n}", "    ");
        insta::assert_snapshot!(members.case_display.to_source(), @r#"
        static var caseDisplayRepresentations: [A: DisplayRepresentation] = [
                .a: "a", .b: "b",
                .c: "c"
            ]
        "#);
    }

    #[test]
    fn test_mapping_follows_tab_indentation() {
        let members = members_for("enum A {\n\tcase a, b\n\tcase c\n}", "\t");
        assert_eq!(
            members.case_display.to_source(),
            "static var caseDisplayRepresentations: [A: DisplayRepresentation] = [\n\t\t.a: \"a\", .b: \"b\",\n\t\t.c: \"c\"\n\t]"
        );
    }

    #[test]
    fn test_indent_step() {
        assert_eq!(indent_step(""), "    ");
        assert_eq!(indent_step("  "), "    ");
        assert_eq!(indent_step("\t\t"), "\t");
    }

    #[test]
    fn test_mapping_preserves_source_order() {
        let members = members_for("enum A { case c, a, b }", "");
        let Some(InitializerClause {
            value: ExprSyntax::Dictionary(mapping),
            ..
        }) = &members.case_display.initializer
        else {
            panic!("expected a dictionary initializer");
        };
        let keys: Vec<String> = mapping
            .elements()
            .iter()
            .map(|element| element.key.trimmed_source())
            .collect();
        assert_eq!(keys, vec![".c", ".a", ".b"]);
    }

    #[test]
    fn test_empty_mapping_is_valid_literal() {
        let members = members_for("enum Empty {}", "    ");
        assert_eq!(
            members.case_display.to_source(),
            "static var caseDisplayRepresentations: [Empty: DisplayRepresentation] = [:]"
        );
    }

    #[test]
    fn test_backticked_case_label_drops_backticks() {
        let members = members_for("enum A { case `default` }", "");
        assert!(
            members
                .case_display
                .to_source()
                .contains(".`default`: \"default\"")
        );
    }

    #[test]
    fn test_synthesized_members_parse_back() {
        let members = members_for("enum A {\n    case a, b\n    case c\n}", "");
        let source = members.case_display.to_source();
        let reparsed = parse_decl(&source).unwrap();
        assert!(
            matches!(&reparsed, Decl::Variable(var) if var.name() == CASE_DISPLAY_REPRESENTATIONS)
        );
        assert_eq!(reparsed.to_source(), source);
    }
}
