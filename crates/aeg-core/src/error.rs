use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{line}:{col}: expected {expected}, found `{found}`")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        col: usize,
    },

    #[error("unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    #[error("{line}:{col}: unterminated string literal")]
    UnterminatedString { line: usize, col: usize },

    #[error("{line}:{col}: unterminated block comment")]
    UnterminatedComment { line: usize, col: usize },

    #[error("{line}:{col}: unbalanced `{delimiter}`")]
    UnbalancedDelimiter {
        delimiter: String,
        line: usize,
        col: usize,
    },

    #[error("expected exactly one declaration, found {0}")]
    DeclarationCount(usize),
}

/// Structured failure raised by a macro expansion; aborts only that expansion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MacroError {
    #[error("`{0}` is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("expansion failed: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("fix-its overlap at byte {0}")]
    OverlappingFixIts(usize),

    #[error("fix-it `{0}` replaces a node without a source position")]
    MissingSpan(String),
}
