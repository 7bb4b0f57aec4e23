use aeg_core::error::ParseError;
use aeg_core::parse::{parse_decl, parse_source};
use aeg_core::syntax::{Decl, DictionaryContent, ExprSyntax, Syntax, TypeSyntax};

const SHORTCUTS: &str = include_str!("fixtures/shortcuts.swift");

#[test]
fn parse_round_trips_fixture() {
    let file = parse_source(SHORTCUTS).expect("should parse shortcuts.swift");
    assert_eq!(file.to_source(), SHORTCUTS);
}

#[test]
fn parse_top_level_kinds() {
    let file = parse_source(SHORTCUTS).unwrap();
    let kinds: Vec<&str> = file.items.iter().map(|item| item.decl.kind_name()).collect();
    assert_eq!(
        kinds,
        vec![
            "declaration",
            "declaration",
            "enum",
            "struct",
            "enum",
            "extension"
        ]
    );
}

#[test]
fn parse_enum_members() {
    let file = parse_source(SHORTCUTS).unwrap();
    let weekday = file.items[2].decl.as_enum().expect("Weekday is an enum");

    assert_eq!(weekday.name.text, "Weekday");
    assert_eq!(weekday.attributes[0].name_text(), "AppEnumGen");
    assert_eq!(weekday.modifiers[0].name.text, "public");

    let clause = weekday.inheritance_clause.as_ref().unwrap();
    assert!(clause.contains("String"));
    assert!(clause.contains("CaseIterable"));
    assert!(!clause.contains("AppEnum"));

    let members = &weekday.member_block.members;
    assert_eq!(members.len(), 7);
    assert_eq!(members.iter().filter(|m| m.decl.is_enum_case()).count(), 4);
    assert!(members[1].semicolon.is_some());
    assert!(matches!(members[4].decl, Decl::Variable(ref var) if var.name() == "workdays"));
    assert!(matches!(members[5].decl, Decl::Variable(ref var) if var.accessor_block.is_some()));
    assert!(matches!(members[6].decl, Decl::Raw(_)));

    let default_case = members[3].decl.as_enum_case().unwrap();
    assert_eq!(default_case.elements[0].name.identifier_text(), "default");
    assert!(default_case.elements[0].raw_value.is_some());
}

#[test]
fn parse_generic_enum() {
    let file = parse_source(SHORTCUTS).unwrap();
    let priority = file.items[4].decl.as_enum().unwrap();

    let generics = priority.generic_parameter_clause.as_ref().unwrap();
    assert_eq!(generics.trimmed_source(), "<Level>");
    assert!(priority.generic_where_clause.is_some());

    let nested = priority.member_block.members[2].decl.as_enum_case().unwrap();
    assert_eq!(nested.modifiers[0].name.text, "indirect");
    assert!(nested.elements[0].associated_value.is_some());
}

#[test]
fn parse_attribute_arguments() {
    let file = parse_source(SHORTCUTS).unwrap();
    let Decl::Type(intent) = &file.items[3].decl else {
        panic!("expected a struct");
    };
    assert_eq!(intent.attributes[0].name_text(), "available");
    assert_eq!(
        intent.attributes[0].arguments.as_ref().unwrap().trimmed_source(),
        "(macOS 13.0, *)"
    );
    let Decl::Variable(day) = &intent.member_block.members[1].decl else {
        panic!("expected a variable");
    };
    assert_eq!(day.attributes[0].name_text(), "Parameter");
}

#[test]
fn parse_dictionary_variable() {
    let decl = parse_decl(
        "static var caseDisplayRepresentations: [A: DisplayRepresentation] = [\n    .a: \"a\", .b: \"b\",\n    .c: \"c\"\n]",
    )
    .unwrap();
    let Decl::Variable(var) = decl else {
        panic!("expected a variable");
    };
    assert!(var.is_static());

    let annotation = var.type_annotation.unwrap();
    let TypeSyntax::Dictionary(dictionary_type) = annotation.ty else {
        panic!("expected a dictionary type");
    };
    assert_eq!(dictionary_type.key.identifier_name(), Some("A"));
    assert_eq!(
        dictionary_type.value.identifier_name(),
        Some("DisplayRepresentation")
    );

    let Some(ExprSyntax::Dictionary(literal)) = var.initializer.map(|init| init.value) else {
        panic!("expected a dictionary literal");
    };
    let keys: Vec<String> = literal
        .elements()
        .iter()
        .map(|element| element.key.trimmed_source())
        .collect();
    assert_eq!(keys, vec![".a", ".b", ".c"]);
}

#[test]
fn parse_empty_dictionary_literal() {
    let Decl::Variable(var) = parse_decl("static var m: [A: B] = [:]").unwrap() else {
        panic!("expected a variable");
    };
    let Some(ExprSyntax::Dictionary(literal)) = var.initializer.map(|init| init.value) else {
        panic!("expected a dictionary literal");
    };
    assert!(matches!(literal.content, DictionaryContent::Empty { .. }));
}

#[test]
fn parse_decl_requires_single_declaration() {
    assert_eq!(
        parse_decl("enum A {}\nenum B {}"),
        Err(ParseError::DeclarationCount(2))
    );
}

#[test]
fn parse_invalid_enum_name() {
    assert_eq!(
        parse_source("enum 1 {}"),
        Err(ParseError::UnexpectedToken {
            expected: "an enum name".to_string(),
            found: "1".to_string(),
            line: 1,
            col: 6,
        })
    );
}

#[test]
fn parse_missing_closing_brace() {
    assert!(matches!(
        parse_source("struct S {\n    var x: Int\n"),
        Err(ParseError::UnexpectedEof(_))
    ));
}

#[test]
fn parse_unbalanced_parenthesis() {
    assert!(matches!(
        parse_source("let x = (1))"),
        Err(ParseError::UnbalancedDelimiter { .. })
    ));
}

#[test]
fn parse_file_with_byte_order_mark_and_raw_strings() {
    let source = "\u{feff}import Foundation\n\nenum Pattern: String {\n    case quoted = #\"say \"hi\"\"#\n}\n";
    let file = parse_source(source).unwrap();
    assert_eq!(file.to_source(), source);

    let pattern = file.items[1].decl.as_enum().unwrap();
    let case = pattern.member_block.members[0].decl.as_enum_case().unwrap();
    assert_eq!(
        case.elements[0].raw_value.as_ref().unwrap().trimmed_source(),
        "= #\"say \"hi\"\"#"
    );
}
