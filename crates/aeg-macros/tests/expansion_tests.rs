use aeg_core::config::AegConfig;
use aeg_core::diagnostics::{Diagnostic, Severity};
use aeg_core::host::{Expansion, apply_fix_its, expand_source};
use aeg_macros::plugin;

const WEEKDAY: &str = include_str!("fixtures/weekday.swift");

fn expand(source: &str) -> Expansion {
    expand_source(source, &plugin(&AegConfig::default())).expect("source should parse")
}

fn fix(source: &str) -> String {
    let expansion = expand(source);
    apply_fix_its(source, &expansion.diagnostics).expect("fix-its should apply")
}

fn rendered(diagnostics: &[Diagnostic], source: &str) -> Vec<String> {
    diagnostics
        .iter()
        .map(|diagnostic| diagnostic.render("input.swift", source).unwrap())
        .collect()
}

#[test]
fn extension_for_enum_without_inheritance() {
    let expansion = expand("@AppEnumGen\nenum A {\n    case a, b\n    case c\n}");
    assert!(expansion.diagnostics.is_empty());
    insta::assert_snapshot!(expansion.expanded_source.trim(), @r#"
    enum A {
        case a, b
        case c
    }

    extension A: AppEnum {
        static var typeDisplayRepresentation: TypeDisplayRepresentation = "A"

        static var caseDisplayRepresentations: [A: DisplayRepresentation] = [
            .a: "a", .b: "b",
            .c: "c"
        ]
    }
    "#);
}

#[test]
fn extension_ignores_existing_conformance() {
    let declared = expand("@AppEnumGen\nenum A: String, AppEnum {\n    case a, b\n    case c\n}");
    let plain = expand("@AppEnumGen\nenum A {\n    case a, b\n    case c\n}");

    let extension_of = |expansion: &Expansion| -> String {
        let start = expansion.expanded_source.find("extension").unwrap();
        expansion.expanded_source[start..].to_string()
    };
    assert_eq!(extension_of(&declared), extension_of(&plain));
    assert!(
        declared
            .expanded_source
            .starts_with("enum A: String, AppEnum {")
    );
}

#[test]
fn extension_for_empty_enum() {
    let expansion = expand("@AppEnumGen\nenum Empty {}");
    insta::assert_snapshot!(expansion.expanded_source.trim(), @r#"
    enum Empty {}

    extension Empty: AppEnum {
        static var typeDisplayRepresentation: TypeDisplayRepresentation = "Empty"

        static var caseDisplayRepresentations: [Empty: DisplayRepresentation] = [:]
    }
    "#);
}

#[test]
fn extension_rejects_struct() {
    let source = "@AppEnumGen\nstruct S {}";
    let expansion = expand(source);
    assert_eq!(expansion.expanded_source, "struct S {}");
    let rendered = rendered(&expansion.diagnostics, source);
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("de.amaider.SwiftMacros.notAnEnum"));
    assert!(rendered[0].contains("× '@AppEnumGen' can only be applied to an 'enum'"));
    assert!(rendered[0].contains("[input.swift:1:1]"));
}

#[test]
fn fix_it_rejects_class() {
    let source = "@AppEnumGenFixIt\nclass C {}";
    let expansion = expand(source);
    assert!(expansion.has_errors());
    assert_eq!(expansion.diagnostics.len(), 1);
    assert_eq!(fix(source), source);
}

#[test]
fn fix_it_emits_warning_and_no_extension() {
    let source = "@AppEnumGenFixIt\nenum A: String {\n    case a, b; case c\n}";
    let expansion = expand(source);
    assert_eq!(expansion.expanded_source, "enum A: String {\n    case a, b; case c\n}");
    let rendered = rendered(&expansion.diagnostics, source);
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("de.amaider.SwiftMacros.replaceEnum"));
    assert!(rendered[0].contains("⚠ Replace the enum with the macro expansion"));
    assert!(rendered[0].contains("help: Update AppEnum [AmaiderMacroFixIt.replaceEnum]"));
    assert_eq!(expansion.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn fix_it_rewrites_enum() {
    insta::assert_snapshot!(fix("@AppEnumGenFixIt\nenum A: String {\n    case a, b; case c\n}"), @r#"
    //@AppEnumGenFixIt
    enum A: String, AppEnum {
        case a, b; case c

        static var typeDisplayRepresentation: TypeDisplayRepresentation = "A"

        static var caseDisplayRepresentations: [A: DisplayRepresentation] = [
            .a: "a", .b: "b",
            .c: "c"
        ]
    }
    "#);
}

#[test]
fn fix_it_on_fixture() {
    insta::assert_snapshot!(fix(WEEKDAY).trim_end(), @r#"
    import AppIntents

    /// Shown in the Shortcuts app.
    //@AppEnumGenFixIt
    @available(macOS 13.0, *)
    public enum Weekday: String, Codable, AppEnum {
        case monday, tuesday
        case wednesday

        static var typeDisplayRepresentation: TypeDisplayRepresentation = "Weekday"

        static var caseDisplayRepresentations: [Weekday: DisplayRepresentation] = [
            .monday: "monday", .tuesday: "tuesday",
            .wednesday: "wednesday"
        ]
    }

    struct Schedule {
        var day: Weekday
    }
    "#);
}

#[test]
fn fix_it_on_one_line_enum() {
    insta::assert_snapshot!(fix("@AppEnumGenFixIt enum A: String { case a, b; case c }"), @r#"
    //@AppEnumGenFixIt
    enum A: String, AppEnum { case a, b; case c

        static var typeDisplayRepresentation: TypeDisplayRepresentation = "A"

        static var caseDisplayRepresentations: [A: DisplayRepresentation] = [
            .a: "a", .b: "b",
            .c: "c"
        ]
    }
    "#);
}

#[test]
fn fix_it_keeps_single_conformance() {
    let fixed = fix("@AppEnumGenFixIt\nenum A: AppEnum, String {\n    case a\n}");
    assert!(fixed.contains("enum A: AppEnum, String {"));
    assert_eq!(fixed.matches("AppEnum").count(), 2);
}

#[test]
fn fix_it_leaves_enum_without_inheritance_unconformed() {
    let fixed = fix("@AppEnumGenFixIt\nenum A {\n    case a\n}");
    assert!(fixed.starts_with("//@AppEnumGenFixIt\nenum A {\n    case a\n\n"));
}

#[test]
fn fix_it_inserts_inheritance_when_configured() {
    let config: AegConfig =
        serde_yaml_ng::from_str("fixit:\n  insert_missing_inheritance: true\n").unwrap();
    let source = "@AppEnumGenFixIt\nenum A {\n    case a\n}";
    let expansion = expand_source(source, &plugin(&config)).unwrap();
    let fixed = apply_fix_its(source, &expansion.diagnostics).unwrap();
    assert!(fixed.starts_with("//@AppEnumGenFixIt\nenum A: AppEnum {\n    case a\n\n"));
}

#[test]
fn fix_it_is_idempotent() {
    let source = "@AppEnumGenFixIt\nenum A: String {\n    case a, b\n    case c\n\n    var x: Int { 1 }\n}\n";
    let first = fix(source);

    let reenabled = first.replace("//@AppEnumGenFixIt", "@AppEnumGenFixIt");
    let second = fix(&reenabled);
    assert_eq!(second, first);
}

#[test]
fn fix_it_picks_up_new_cases() {
    let first = fix("@AppEnumGenFixIt\nenum A: String {\n    case a\n}");
    let edited = first
        .replace("//@AppEnumGenFixIt", "@AppEnumGenFixIt")
        .replace("    case a\n", "    case a\n    case z\n");
    let second = fix(&edited);
    assert!(second.contains(".a: \"a\",\n        .z: \"z\"\n    ]"));
    assert_eq!(second.matches("typeDisplayRepresentation").count(), 1);
}

#[test]
fn both_macros_on_independent_enums() {
    let source = "@AppEnumGen\nenum A { case a }\n\n@AppEnumGenFixIt\nenum B: Int { case b }\n";
    let expansion = expand(source);
    assert_eq!(expansion.diagnostics.len(), 1);
    assert!(
        expansion
            .expanded_source
            .contains("extension A: AppEnum {")
    );
    assert!(!expansion.expanded_source.contains("extension B"));

    let fixed = apply_fix_its(source, &expansion.diagnostics).unwrap();
    assert!(fixed.starts_with("@AppEnumGen\nenum A { case a }\n\n//@AppEnumGenFixIt\nenum B: Int, AppEnum { case b\n"));
}

#[test]
fn nested_fix_it_is_reported_not_dropped() {
    let source = "struct S {\n    @AppEnumGenFixIt\n    enum A: String { case a }\n}\n";
    let expansion = expand(source);
    assert_eq!(expansion.expanded_source, source);
    assert_eq!(expansion.diagnostics.len(), 1);
    assert_eq!(expansion.diagnostics[0].id.id, "nestedAttachment");
    assert_eq!(fix(source), source);
}

#[test]
fn qualified_conformance_is_not_added_again() {
    let fixed = fix("@AppEnumGenFixIt\nenum A: String, AppIntents.AppEnum {\n    case a\n}");
    assert!(fixed.contains("enum A: String, AppIntents.AppEnum {"));
    assert!(!fixed.contains(", AppEnum"));
}

#[test]
fn tab_indented_fix_it() {
    insta::assert_snapshot!(fix("@AppEnumGenFixIt\nenum A: String {\n\tcase a\n}").replace('\t', "<tab>"), @r#"
    //@AppEnumGenFixIt
    enum A: String, AppEnum {
    <tab>case a

    <tab>static var typeDisplayRepresentation: TypeDisplayRepresentation = "A"

    <tab>static var caseDisplayRepresentations: [A: DisplayRepresentation] = [
    <tab><tab>.a: "a"
    <tab>]
    }
    "#);
}
