use std::fmt;

/// A single piece of non-semantic source text attached to a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaPiece {
    Spaces(usize),
    Tabs(usize),
    Newlines(usize),
    CarriageReturns(usize),
    /// `// ...` up to, but not including, the newline.
    LineComment(String),
    /// `/* ... */` including the delimiters.
    BlockComment(String),
    /// U+FEFF at the very start of a file.
    ByteOrderMark,
}

impl TriviaPiece {
    fn is_whitespace(&self) -> bool {
        matches!(
            self,
            TriviaPiece::Spaces(_) | TriviaPiece::Tabs(_) | TriviaPiece::CarriageReturns(_)
        )
    }
}

impl fmt::Display for TriviaPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriviaPiece::Spaces(n) => write!(f, "{}", " ".repeat(*n)),
            TriviaPiece::Tabs(n) => write!(f, "{}", "\t".repeat(*n)),
            TriviaPiece::Newlines(n) => write!(f, "{}", "\n".repeat(*n)),
            TriviaPiece::CarriageReturns(n) => write!(f, "{}", "\r".repeat(*n)),
            TriviaPiece::LineComment(text) | TriviaPiece::BlockComment(text) => f.write_str(text),
            TriviaPiece::ByteOrderMark => f.write_str("\u{feff}"),
        }
    }
}

/// Ordered trivia pieces. Adjacent pieces of the same whitespace kind are merged on push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    pieces: Vec<TriviaPiece>,
}

impl Trivia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn space() -> Self {
        Self::spaces(1)
    }

    pub fn spaces(n: usize) -> Self {
        let mut trivia = Self::new();
        trivia.push(TriviaPiece::Spaces(n));
        trivia
    }

    pub fn newlines(n: usize) -> Self {
        let mut trivia = Self::new();
        trivia.push(TriviaPiece::Newlines(n));
        trivia
    }

    /// `n` newlines followed by `indent` (spaces and tabs are preserved as written).
    pub fn newlines_indent(n: usize, indent: &str) -> Self {
        let mut trivia = Self::newlines(n);
        trivia.push_whitespace(indent);
        trivia
    }

    pub fn newline_indent(indent: &str) -> Self {
        Self::newlines_indent(1, indent)
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        &self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn push(&mut self, piece: TriviaPiece) {
        match (self.pieces.last_mut(), &piece) {
            (Some(TriviaPiece::Spaces(a)), TriviaPiece::Spaces(b))
            | (Some(TriviaPiece::Tabs(a)), TriviaPiece::Tabs(b))
            | (Some(TriviaPiece::Newlines(a)), TriviaPiece::Newlines(b))
            | (Some(TriviaPiece::CarriageReturns(a)), TriviaPiece::CarriageReturns(b)) => *a += *b,
            _ => self.pieces.push(piece),
        }
    }

    /// Push every space and tab of `text`; other characters are ignored.
    pub fn push_whitespace(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                ' ' => self.push(TriviaPiece::Spaces(1)),
                '\t' => self.push(TriviaPiece::Tabs(1)),
                _ => {}
            }
        }
    }

    pub fn has_newline(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| matches!(p, TriviaPiece::Newlines(_)))
    }

    /// Whitespace following the last newline, i.e. the indentation of the token this trivia leads.
    pub fn indentation(&self) -> Option<String> {
        let last_newline = self
            .pieces
            .iter()
            .rposition(|p| matches!(p, TriviaPiece::Newlines(_)))?;
        let indent = self.pieces[last_newline + 1..]
            .iter()
            .take_while(|p| matches!(p, TriviaPiece::Spaces(_) | TriviaPiece::Tabs(_)))
            .map(|p| p.to_string())
            .collect();
        Some(indent)
    }

    /// Drop whitespace at the end; comments are kept.
    pub fn trim_trailing_whitespace(&mut self) {
        while self.pieces.last().is_some_and(TriviaPiece::is_whitespace) {
            self.pieces.pop();
        }
    }

    pub fn trimmed_trailing_whitespace(mut self) -> Self {
        self.trim_trailing_whitespace();
        self
    }
}

impl From<Vec<TriviaPiece>> for Trivia {
    fn from(pieces: Vec<TriviaPiece>) -> Self {
        let mut trivia = Trivia::new();
        for piece in pieces {
            trivia.push(piece);
        }
        trivia
    }
}

impl fmt::Display for Trivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}
