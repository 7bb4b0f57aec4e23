use crate::error::ParseError;
use crate::syntax::token::is_keyword;
use crate::syntax::{Span, Token, TokenKind, Trivia, TriviaPiece};

const OPERATOR_CHARS: &str = "/=-+!*%<>&|^~?";

/// Split `source` into tokens. The last token is always [`TokenKind::Eof`], carrying any
/// trivia after the final real token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).lex()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn lex(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        let mut leading = self.lex_trivia(false)?;
        loop {
            let start = self.pos;
            if self.peek().is_none() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    leading_trivia: leading,
                    trailing_trivia: Trivia::new(),
                    span: Some(Span::new(start, start)),
                });
                return Ok(tokens);
            }

            let kind = self.lex_token()?;
            let end = self.pos;
            let trailing = self.lex_trivia(true)?;
            tokens.push(Token {
                kind,
                text: self.source[start..end].to_string(),
                leading_trivia: leading,
                trailing_trivia: trailing,
                span: Some(Span::new(start, end)),
            });
            leading = self.lex_trivia(false)?;
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn rest(&self) -> &str {
        &self.source[self.pos..]
    }

    fn location(&self, offset: usize) -> (usize, usize) {
        Span::new(offset, offset).line_col(self.source)
    }

    /// Trailing trivia stops before a newline; leading trivia takes everything.
    fn lex_trivia(&mut self, trailing: bool) -> Result<Trivia, ParseError> {
        let mut trivia = Trivia::new();
        while let Some(ch) = self.peek() {
            match ch {
                ' ' => trivia.push(TriviaPiece::Spaces(1)),
                '\t' => trivia.push(TriviaPiece::Tabs(1)),
                '\n' | '\r' if trailing => break,
                '\n' => trivia.push(TriviaPiece::Newlines(1)),
                '\r' => trivia.push(TriviaPiece::CarriageReturns(1)),
                '\u{feff}' if self.pos == 0 => trivia.push(TriviaPiece::ByteOrderMark),
                '/' if self.peek_nth(1) == Some('/') => {
                    let len = self.rest().find('\n').unwrap_or(self.rest().len());
                    let comment = self.rest()[..len].trim_end_matches('\r').to_string();
                    self.pos += comment.len();
                    trivia.push(TriviaPiece::LineComment(comment));
                    continue;
                }
                '/' if self.peek_nth(1) == Some('*') => {
                    let start = self.pos;
                    let Some(end) = self.rest()[2..].find("*/") else {
                        let (line, col) = self.location(start);
                        return Err(ParseError::UnterminatedComment { line, col });
                    };
                    let comment = self.rest()[..end + 4].to_string();
                    self.pos += comment.len();
                    trivia.push(TriviaPiece::BlockComment(comment));
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        Ok(trivia)
    }

    fn lex_token(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        let Some(ch) = self.bump() else {
            return Ok(TokenKind::Eof);
        };
        let kind = match ch {
            '"' => self.lex_string(start)?,
            '`' => {
                match self.rest().find('`') {
                    Some(end) if !self.rest()[..end].contains('\n') => self.pos += end + 1,
                    _ => {
                        let (line, col) = self.location(start);
                        return Err(ParseError::UnexpectedToken {
                            expected: "closing back-tick".to_string(),
                            found: "`".to_string(),
                            line,
                            col,
                        });
                    }
                }
                TokenKind::Identifier
            }
            c if c == '_' || c == '$' || c.is_alphabetic() => {
                self.eat_while(|c| c == '_' || c.is_alphanumeric());
                if is_keyword(&self.source[start..self.pos]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            c if c.is_ascii_digit() => {
                loop {
                    self.eat_while(|c| c == '_' || c.is_ascii_alphanumeric());
                    let fraction =
                        self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit());
                    if !fraction {
                        break;
                    }
                    self.bump();
                }
                TokenKind::NumberLiteral
            }
            '#' if self.rest().trim_start_matches('#').starts_with('"') => {
                self.lex_raw_string(start)?
            }
            '#' if self.peek().is_some_and(|c| c == '_' || c.is_alphabetic()) => {
                self.eat_while(|c| c == '_' || c.is_alphanumeric());
                TokenKind::PoundKeyword
            }
            '@' => TokenKind::AtSign,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Period,
            ';' => TokenKind::Semicolon,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftSquare,
            ']' => TokenKind::RightSquare,
            '#' => TokenKind::Operator,
            c if OPERATOR_CHARS.contains(c) => {
                while let Some(next) = self.peek() {
                    let comment_start = next == '/' && matches!(self.peek_nth(1), Some('/' | '*'));
                    if !OPERATOR_CHARS.contains(next) || comment_start {
                        break;
                    }
                    self.bump();
                }
                match &self.source[start..self.pos] {
                    "=" => TokenKind::Equal,
                    "->" => TokenKind::Arrow,
                    _ => TokenKind::Operator,
                }
            }
            other => {
                let (line, col) = self.location(start);
                return Err(ParseError::UnexpectedToken {
                    expected: "a token".to_string(),
                    found: other.to_string(),
                    line,
                    col,
                });
            }
        };
        Ok(kind)
    }

    fn lex_string(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        let (line, col) = self.location(start);
        if self.rest().starts_with("\"\"") {
            self.pos += 2;
            let Some(end) = self.rest().find("\"\"\"") else {
                return Err(ParseError::UnterminatedString { line, col });
            };
            self.pos += end + 3;
            return Ok(TokenKind::StringLiteral);
        }
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('"') => return Ok(TokenKind::StringLiteral),
                Some('\n') | None => return Err(ParseError::UnterminatedString { line, col }),
                Some(_) => {}
            }
        }
    }

    /// `#"..."#`, `##"..."##` or `#"""..."""#`; the closing quote needs as many `#` as the
    /// opening one.
    fn lex_raw_string(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        let (line, col) = self.location(start);
        self.eat_while(|c| c == '#');
        let hashes = "#".repeat(self.pos - start);
        self.bump();

        let (delimiter, single_line) = if self.rest().starts_with("\"\"") {
            self.pos += 2;
            (format!("\"\"\"{hashes}"), false)
        } else {
            (format!("\"{hashes}"), true)
        };
        match self.rest().find(&delimiter) {
            Some(end) if !(single_line && self.rest()[..end].contains('\n')) => {
                self.pos += end + delimiter.len();
                Ok(TokenKind::StringLiteral)
            }
            _ => Err(ParseError::UnterminatedString { line, col }),
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }
}
