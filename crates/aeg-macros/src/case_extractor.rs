use aeg_core::syntax::{MemberBlock, Token};

/// One case name pulled out of a `case` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseEntry {
    /// The case name as written, back-ticks included, without trivia.
    pub name: Token,
    /// Which `case` declaration of the enum the name came from, counting only case declarations.
    pub declaration_index: usize,
}

impl CaseEntry {
    /// The case name with back-ticks stripped.
    pub fn label(&self) -> &str {
        self.name.identifier_text()
    }
}

/// Flatten every `case` declaration of a member block into its names, in source order.
///
/// Other members (properties, functions, nested types) are skipped.
pub fn extract_cases(member_block: &MemberBlock) -> Vec<CaseEntry> {
    let cases: Vec<CaseEntry> = member_block
        .members
        .iter()
        .filter_map(|member| member.decl.as_enum_case())
        .enumerate()
        .flat_map(|(declaration_index, case_decl)| {
            case_decl.elements.iter().map(move |element| CaseEntry {
                name: element.name.trimmed(),
                declaration_index,
            })
        })
        .collect();
    log::debug!("extracted {} cases", cases.len());
    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeg_core::parse::parse_decl;

    fn cases_of(source: &str) -> Vec<(String, usize)> {
        let decl = parse_decl(source).unwrap();
        let enum_decl = decl.as_enum().unwrap();
        extract_cases(&enum_decl.member_block)
            .into_iter()
            .map(|entry| (entry.name.text, entry.declaration_index))
            .collect()
    }

    #[test]
    fn test_flattens_case_lists_in_order() {
        let cases = cases_of("enum A {\n    case b, a\n    case c\n}");
        assert_eq!(
            cases,
            vec![
                ("b".to_string(), 0),
                ("a".to_string(), 0),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_skips_other_members() {
        let source = r#"enum A: String {
    case a = "x"
    static let fallback = A.a
    var label: String { rawValue }
    func describe() -> String { label }
    enum Nested { case inner }
    case b
}"#;
        let cases = cases_of(source);
        assert_eq!(cases, vec![("a".to_string(), 0), ("b".to_string(), 1)]);
    }

    #[test]
    fn test_semicolon_separated_cases() {
        let cases = cases_of("enum A { case a, b; case c }");
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[2], ("c".to_string(), 1));
    }

    #[test]
    fn test_backticked_names_keep_spelling() {
        let decl = parse_decl("enum A {\n    case `default`, other\n}").unwrap();
        let cases = extract_cases(&decl.as_enum().unwrap().member_block);
        assert_eq!(cases[0].name.text, "`default`");
        assert_eq!(cases[0].label(), "default");
        assert!(cases[0].name.leading_trivia.is_empty());
        assert!(cases[0].name.span.is_none());
    }

    #[test]
    fn test_empty_enum() {
        assert!(cases_of("enum Empty {}").is_empty());
    }
}
