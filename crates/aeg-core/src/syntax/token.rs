use std::fmt;

use miette::{SourceCode, SourceSpan};

use crate::error::MacroError;

use super::trivia::Trivia;

/// Byte range of a token's text (trivia excluded) in the parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// 1-based line and column of `start` within `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let at = SourceSpan::from(self.start.min(source.len())..self.start.min(source.len()));
        match source.read_span(&at, 0, 0) {
            Ok(contents) => (contents.line() + 1, contents.column() + 1),
            Err(_) => (1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    StringLiteral,
    NumberLiteral,
    /// `#if`, `#available`, ...
    PoundKeyword,
    AtSign,
    Colon,
    Comma,
    Period,
    Semicolon,
    Equal,
    Arrow,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftSquare,
    RightSquare,
    Operator,
    Eof,
}

pub const KEYWORDS: &[&str] = &[
    "as",
    "associatedtype",
    "break",
    "case",
    "catch",
    "class",
    "continue",
    "default",
    "defer",
    "deinit",
    "do",
    "else",
    "enum",
    "extension",
    "fallthrough",
    "false",
    "fileprivate",
    "for",
    "func",
    "guard",
    "if",
    "import",
    "in",
    "init",
    "inout",
    "internal",
    "is",
    "let",
    "nil",
    "operator",
    "private",
    "protocol",
    "public",
    "repeat",
    "rethrows",
    "return",
    "self",
    "Self",
    "static",
    "struct",
    "subscript",
    "super",
    "switch",
    "throw",
    "throws",
    "true",
    "try",
    "typealias",
    "var",
    "where",
    "while",
];

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Whether `text` is a plain or back-ticked Swift identifier.
pub fn is_identifier(text: &str) -> bool {
    let bare = match text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
        Some(inner) => inner,
        None if is_keyword(text) => return false,
        None => text,
    };
    let mut chars = bare.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// A token with its surrounding trivia.
///
/// Trailing trivia runs up to the next newline; the newline and everything after it
/// belong to the next token's leading trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub leading_trivia: Trivia,
    pub trailing_trivia: Trivia,
    pub span: Option<Span>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading_trivia: Trivia::new(),
            trailing_trivia: Trivia::new(),
            span: None,
        }
    }

    /// A validated identifier token.
    pub fn identifier(text: &str) -> Result<Self, MacroError> {
        if !is_identifier(text) {
            return Err(MacroError::InvalidIdentifier(text.to_string()));
        }
        Ok(Self::new(TokenKind::Identifier, text))
    }

    pub fn keyword(text: &str) -> Self {
        Self::new(TokenKind::Keyword, text)
    }

    /// A string literal for `value`, escaping quotes and backslashes.
    pub fn string_literal(value: &str) -> Self {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        Self::new(TokenKind::StringLiteral, format!("\"{escaped}\""))
    }

    pub fn at_sign() -> Self {
        Self::new(TokenKind::AtSign, "@")
    }

    pub fn colon() -> Self {
        Self::new(TokenKind::Colon, ":")
    }

    pub fn comma() -> Self {
        Self::new(TokenKind::Comma, ",")
    }

    pub fn period() -> Self {
        Self::new(TokenKind::Period, ".")
    }

    pub fn equal() -> Self {
        Self::new(TokenKind::Equal, "=")
    }

    pub fn left_brace() -> Self {
        Self::new(TokenKind::LeftBrace, "{")
    }

    pub fn right_brace() -> Self {
        Self::new(TokenKind::RightBrace, "}")
    }

    pub fn left_square() -> Self {
        Self::new(TokenKind::LeftSquare, "[")
    }

    pub fn right_square() -> Self {
        Self::new(TokenKind::RightSquare, "]")
    }

    pub fn with_leading_trivia(mut self, trivia: Trivia) -> Self {
        self.leading_trivia = trivia;
        self
    }

    pub fn with_trailing_trivia(mut self, trivia: Trivia) -> Self {
        self.trailing_trivia = trivia;
        self
    }

    /// Shorthand for a single trailing space.
    pub fn spaced(self) -> Self {
        self.with_trailing_trivia(Trivia::space())
    }

    /// The token without trivia or source position.
    pub fn trimmed(&self) -> Self {
        Self::new(self.kind, self.text.clone())
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text
    }

    /// Identifier text without back-ticks.
    pub fn identifier_text(&self) -> &str {
        self.text
            .strip_prefix('`')
            .and_then(|t| t.strip_suffix('`'))
            .unwrap_or(&self.text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.leading_trivia, self.text, self.trailing_trivia
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(Token::identifier("Weekday").is_ok());
        assert!(Token::identifier("_private2").is_ok());
        assert!(Token::identifier("`default`").is_ok());
        assert!(matches!(
            Token::identifier("App Enum"),
            Err(MacroError::InvalidIdentifier(name)) if name == "App Enum"
        ));
        assert!(Token::identifier("enum").is_err());
        assert!(Token::identifier("1st").is_err());
        assert!(Token::identifier("").is_err());
    }

    #[test]
    fn test_identifier_text_strips_backticks() {
        let token = Token::identifier("`default`").unwrap();
        assert_eq!(token.identifier_text(), "default");
        assert_eq!(token.text, "`default`");
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(Token::string_literal("A").text, "\"A\"");
        assert_eq!(Token::string_literal("a\"b").text, "\"a\\\"b\"");
    }

    #[test]
    fn test_span_line_col() {
        let source = "enum A {\n    case a\n}";
        let span = Span::new(source.find("case").unwrap(), 17);
        assert_eq!(span.line_col(source), (2, 5));
        assert_eq!(Span::new(0, 4).line_col(source), (1, 1));
        assert_eq!(Span::new(source.len(), source.len()).line_col(source), (3, 2));
    }
}
