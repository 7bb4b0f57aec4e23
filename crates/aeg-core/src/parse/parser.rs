use crate::error::ParseError;
use crate::syntax::*;

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "package",
    "open",
    "final",
    "indirect",
    "static",
    "override",
    "required",
    "convenience",
    "lazy",
    "weak",
    "unowned",
    "mutating",
    "nonmutating",
    "nonisolated",
    "dynamic",
    "optional",
];

/// Keywords after which `class` is a modifier rather than a declaration.
const CLASS_MEMBER_KEYWORDS: &[&str] = &["var", "let", "func", "subscript", "init", "typealias"];

enum DeclStart {
    Enum,
    Type,
    Extension,
    Case,
    Variable,
    Other,
}

pub(crate) struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    pub(crate) fn parse_source_file(&mut self) -> Result<SourceFile, ParseError> {
        let mut items = Vec::new();
        while !self.at(TokenKind::Eof) {
            items.push(self.parse_item()?);
        }
        let end_of_file = self.bump();
        Ok(SourceFile { items, end_of_file })
    }

    // ---- token cursor ----

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    fn at_keyword(&self, text: &str) -> bool {
        self.peek().is_keyword(text)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        match token.span {
            _ if token.is(TokenKind::Eof) => ParseError::UnexpectedEof(expected.to_string()),
            Some(span) => {
                let (line, col) = span.line_col(self.source);
                ParseError::UnexpectedToken {
                    expected: expected.to_string(),
                    found: token.text.clone(),
                    line,
                    col,
                }
            }
            None => ParseError::UnexpectedEof(expected.to_string()),
        }
    }

    fn unbalanced(&self, token: &Token) -> ParseError {
        let (line, col) = token
            .span
            .map(|span| span.line_col(self.source))
            .unwrap_or((0, 0));
        ParseError::UnbalancedDelimiter {
            delimiter: token.text.clone(),
            line,
            col,
        }
    }

    /// Run `parse`, rewinding the cursor if it fails.
    fn attempt<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Option<T> {
        let start = self.pos;
        match parse(self) {
            Ok(node) => Some(node),
            Err(err) => {
                log::trace!("backtracking: {err}");
                self.pos = start;
                None
            }
        }
    }

    /// Whether the current token may follow a complete declaration.
    fn at_decl_end(&self) -> bool {
        let token = self.peek();
        matches!(
            token.kind,
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
        ) || token.leading_trivia.has_newline()
    }

    // ---- declarations ----

    fn parse_item(&mut self) -> Result<MemberBlockItem, ParseError> {
        let decl = self.parse_decl()?;
        let semicolon = self
            .at(TokenKind::Semicolon)
            .then(|| self.bump());
        Ok(MemberBlockItem { decl, semicolon })
    }

    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        let attributes = self.parse_attributes()?;
        let modifiers = self.parse_modifiers()?;

        let decl = match self.decl_start() {
            DeclStart::Enum => Decl::Enum(self.parse_enum(attributes, modifiers)?),
            DeclStart::Type => Decl::Type(self.parse_type_decl(attributes, modifiers)?),
            DeclStart::Extension => Decl::Extension(self.parse_extension(attributes, modifiers)?),
            DeclStart::Case => {
                let (attrs, mods) = (attributes.clone(), modifiers.clone());
                match self.attempt(|p| p.parse_enum_case(attrs, mods)) {
                    Some(decl) => Decl::EnumCase(decl),
                    None => Decl::Raw(self.parse_raw_decl(attributes, modifiers)?),
                }
            }
            DeclStart::Variable => {
                let (attrs, mods) = (attributes.clone(), modifiers.clone());
                match self.attempt(|p| p.parse_variable(attrs, mods)) {
                    Some(decl) => Decl::Variable(decl),
                    None => Decl::Raw(self.parse_raw_decl(attributes, modifiers)?),
                }
            }
            DeclStart::Other => Decl::Raw(self.parse_raw_decl(attributes, modifiers)?),
        };
        Ok(decl)
    }

    fn decl_start(&self) -> DeclStart {
        let token = self.peek();
        match token.text.as_str() {
            "enum" if token.is(TokenKind::Keyword) => DeclStart::Enum,
            "struct" | "class" | "protocol" if token.is(TokenKind::Keyword) => DeclStart::Type,
            "actor" if self.peek_nth(1).is(TokenKind::Identifier) => DeclStart::Type,
            "extension" if token.is(TokenKind::Keyword) => DeclStart::Extension,
            "case" if token.is(TokenKind::Keyword) => DeclStart::Case,
            "var" | "let" if token.is(TokenKind::Keyword) => DeclStart::Variable,
            _ => DeclStart::Other,
        }
    }

    fn parse_attributes(&mut self) -> Result<Vec<AttributeSyntax>, ParseError> {
        let mut attributes = Vec::new();
        while self.at(TokenKind::AtSign) {
            let at_sign = self.bump();
            if !matches!(self.peek().kind, TokenKind::Identifier | TokenKind::Keyword) {
                return Err(self.unexpected("an attribute name"));
            }
            let name = self.bump();
            let arguments = if self.at(TokenKind::LeftParen) && name.trailing_trivia.is_empty() {
                Some(self.parse_balanced()?)
            } else {
                None
            };
            attributes.push(AttributeSyntax {
                at_sign,
                name,
                arguments,
            });
        }
        Ok(attributes)
    }

    fn parse_modifiers(&mut self) -> Result<Vec<DeclModifier>, ParseError> {
        let mut modifiers = Vec::new();
        loop {
            let token = self.peek();
            let is_modifier = match token.kind {
                TokenKind::Keyword | TokenKind::Identifier => {
                    MODIFIERS.contains(&token.text.as_str())
                        && matches!(
                            self.peek_nth(1).kind,
                            TokenKind::Keyword | TokenKind::Identifier | TokenKind::LeftParen
                        )
                        || (token.is_keyword("class") && {
                            let next = self.peek_nth(1);
                            next.is(TokenKind::Keyword)
                                && CLASS_MEMBER_KEYWORDS.contains(&next.text.as_str())
                                || MODIFIERS.contains(&next.text.as_str())
                        })
                }
                _ => false,
            };
            if !is_modifier {
                return Ok(modifiers);
            }
            let name = self.bump();
            let detail = if self.at(TokenKind::LeftParen) && name.trailing_trivia.is_empty() {
                Some(self.parse_balanced()?)
            } else {
                None
            };
            modifiers.push(DeclModifier { name, detail });
        }
    }

    fn parse_enum(
        &mut self,
        attributes: Vec<AttributeSyntax>,
        modifiers: Vec<DeclModifier>,
    ) -> Result<EnumDecl, ParseError> {
        let enum_keyword = self.bump();
        let name = self.expect(TokenKind::Identifier, "an enum name")?;
        let generic_parameter_clause = self.parse_generic_parameters()?;
        let inheritance_clause = self.parse_inheritance()?;
        let generic_where_clause = self.parse_where_clause()?;
        let member_block = self.parse_member_block()?;
        Ok(EnumDecl {
            attributes,
            modifiers,
            enum_keyword,
            name,
            generic_parameter_clause,
            inheritance_clause,
            generic_where_clause,
            member_block,
        })
    }

    fn parse_type_decl(
        &mut self,
        attributes: Vec<AttributeSyntax>,
        modifiers: Vec<DeclModifier>,
    ) -> Result<TypeDecl, ParseError> {
        let keyword = self.bump();
        let name = self.expect(TokenKind::Identifier, "a type name")?;
        let generic_parameter_clause = self.parse_generic_parameters()?;
        let inheritance_clause = self.parse_inheritance()?;
        let generic_where_clause = self.parse_where_clause()?;
        let member_block = self.parse_member_block()?;
        Ok(TypeDecl {
            attributes,
            modifiers,
            keyword,
            name,
            generic_parameter_clause,
            inheritance_clause,
            generic_where_clause,
            member_block,
        })
    }

    fn parse_extension(
        &mut self,
        attributes: Vec<AttributeSyntax>,
        modifiers: Vec<DeclModifier>,
    ) -> Result<ExtensionDecl, ParseError> {
        let extension_keyword = self.bump();
        let extended_type = self.parse_type()?;
        let inheritance_clause = self.parse_inheritance()?;
        let generic_where_clause = self.parse_where_clause()?;
        let member_block = self.parse_member_block()?;
        Ok(ExtensionDecl {
            attributes,
            modifiers,
            extension_keyword,
            extended_type,
            inheritance_clause,
            generic_where_clause,
            member_block,
        })
    }

    fn parse_generic_parameters(&mut self) -> Result<Option<RawTokens>, ParseError> {
        if !(self.at(TokenKind::Operator) && self.peek().text.starts_with('<')) {
            return Ok(None);
        }
        let mut tokens = Vec::new();
        let mut depth = 0i32;
        loop {
            let token = self.peek();
            if token.is(TokenKind::Eof) {
                return Err(self.unbalanced(&tokens[0]));
            }
            if token.is(TokenKind::Operator) {
                depth += angle_delta(&token.text);
            }
            tokens.push(self.bump());
            if depth <= 0 {
                return Ok(Some(RawTokens::new(tokens)));
            }
        }
    }

    fn parse_where_clause(&mut self) -> Result<Option<RawTokens>, ParseError> {
        if !self.at_keyword("where") {
            return Ok(None);
        }
        let mut tokens = vec![self.bump()];
        while !matches!(self.peek().kind, TokenKind::LeftBrace | TokenKind::Eof) {
            tokens.push(self.bump());
        }
        Ok(Some(RawTokens::new(tokens)))
    }

    fn parse_inheritance(&mut self) -> Result<Option<InheritanceClause>, ParseError> {
        if !self.at(TokenKind::Colon) {
            return Ok(None);
        }
        let colon = self.bump();
        let mut inherited_types = Vec::new();
        loop {
            let ty = self.parse_type()?;
            let trailing_comma = self.at(TokenKind::Comma).then(|| self.bump());
            let more = trailing_comma.is_some() && !self.at(TokenKind::LeftBrace);
            inherited_types.push(InheritedType { ty, trailing_comma });
            if !more {
                break;
            }
        }
        Ok(Some(InheritanceClause {
            colon,
            inherited_types,
        }))
    }

    fn parse_member_block(&mut self) -> Result<MemberBlock, ParseError> {
        let left_brace = self.expect(TokenKind::LeftBrace, "`{`")?;
        let mut members = Vec::new();
        while !matches!(self.peek().kind, TokenKind::RightBrace | TokenKind::Eof) {
            members.push(self.parse_item()?);
        }
        let right_brace = self.expect(TokenKind::RightBrace, "`}`")?;
        Ok(MemberBlock {
            left_brace,
            members,
            right_brace,
        })
    }

    fn parse_enum_case(
        &mut self,
        attributes: Vec<AttributeSyntax>,
        modifiers: Vec<DeclModifier>,
    ) -> Result<EnumCaseDecl, ParseError> {
        let case_keyword = self.bump();
        let mut elements = Vec::new();
        loop {
            let name = self.expect(TokenKind::Identifier, "a case name")?;
            let associated_value = if self.at(TokenKind::LeftParen) {
                Some(self.parse_balanced()?)
            } else {
                None
            };
            let raw_value = if self.at(TokenKind::Equal) {
                let equal = self.bump();
                let value = self.parse_expr()?;
                Some(InitializerClause { equal, value })
            } else {
                None
            };
            let trailing_comma = self.at(TokenKind::Comma).then(|| self.bump());
            let more = trailing_comma.is_some();
            elements.push(EnumCaseElement {
                name,
                associated_value,
                raw_value,
                trailing_comma,
            });
            if !more {
                break;
            }
        }
        if !self.at_decl_end() {
            return Err(self.unexpected("end of case declaration"));
        }
        Ok(EnumCaseDecl {
            attributes,
            modifiers,
            case_keyword,
            elements,
        })
    }

    fn parse_variable(
        &mut self,
        attributes: Vec<AttributeSyntax>,
        modifiers: Vec<DeclModifier>,
    ) -> Result<VariableDecl, ParseError> {
        let binding_specifier = self.bump();
        let pattern = self.expect(TokenKind::Identifier, "a variable name")?;
        let type_annotation = if self.at(TokenKind::Colon) {
            let colon = self.bump();
            let ty = self.parse_type()?;
            Some(TypeAnnotation { colon, ty })
        } else {
            None
        };
        let initializer = if self.at(TokenKind::Equal) {
            let equal = self.bump();
            let value = self.parse_expr()?;
            Some(InitializerClause { equal, value })
        } else {
            None
        };
        let accessor_block = if self.at(TokenKind::LeftBrace) {
            Some(self.parse_balanced()?)
        } else {
            None
        };
        if !self.at_decl_end() {
            return Err(self.unexpected("end of variable declaration"));
        }
        Ok(VariableDecl {
            attributes,
            modifiers,
            binding_specifier,
            pattern,
            type_annotation,
            initializer,
            accessor_block,
        })
    }

    /// Everything up to the end of the line at nesting depth zero. A line starting with
    /// `{`, `.`, `=`, `->` or an operator continues the declaration.
    fn parse_raw_decl(
        &mut self,
        attributes: Vec<AttributeSyntax>,
        modifiers: Vec<DeclModifier>,
    ) -> Result<RawDecl, ParseError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            if depth == 0 {
                let ends = match token.kind {
                    TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof => true,
                    TokenKind::RightParen | TokenKind::RightSquare => {
                        return Err(self.unbalanced(token));
                    }
                    TokenKind::LeftBrace
                    | TokenKind::Period
                    | TokenKind::Equal
                    | TokenKind::Arrow
                    | TokenKind::Operator => false,
                    _ => token.leading_trivia.has_newline(),
                };
                if tokens.is_empty() {
                    if matches!(token.kind, TokenKind::RightBrace | TokenKind::Eof) {
                        return Err(self.unexpected("a declaration"));
                    }
                } else if ends {
                    break;
                }
            } else if token.is(TokenKind::Eof) {
                return Err(self.unbalanced(&tokens[0]));
            }
            match token.kind {
                TokenKind::LeftBrace | TokenKind::LeftParen | TokenKind::LeftSquare => depth += 1,
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightSquare => {
                    depth -= 1
                }
                _ => {}
            }
            tokens.push(self.bump());
        }
        Ok(RawDecl {
            attributes,
            modifiers,
            body: RawTokens::new(tokens),
        })
    }

    // ---- types and expressions ----

    fn parse_type(&mut self) -> Result<TypeSyntax, ParseError> {
        let mut tokens = Vec::new();
        let mut depth = 0i32;
        loop {
            let token = self.peek();
            if depth == 0 {
                let stop = matches!(
                    token.kind,
                    TokenKind::Comma
                        | TokenKind::LeftBrace
                        | TokenKind::RightBrace
                        | TokenKind::RightParen
                        | TokenKind::RightSquare
                        | TokenKind::Colon
                        | TokenKind::Equal
                        | TokenKind::Semicolon
                        | TokenKind::Eof
                ) || token.is_keyword("where")
                    || (!tokens.is_empty() && token.leading_trivia.has_newline());
                if stop {
                    break;
                }
            } else if token.is(TokenKind::Eof) {
                return Err(self.unbalanced(&tokens[0]));
            }
            match token.kind {
                TokenKind::LeftParen | TokenKind::LeftSquare => depth += 1,
                TokenKind::RightParen | TokenKind::RightSquare => depth -= 1,
                TokenKind::Operator => depth += angle_delta(&token.text),
                _ => {}
            }
            tokens.push(self.bump());
        }
        if tokens.is_empty() {
            return Err(self.unexpected("a type"));
        }
        Ok(classify_type(tokens))
    }

    fn parse_expr(&mut self) -> Result<ExprSyntax, ParseError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            if depth == 0 {
                let stop = matches!(
                    token.kind,
                    TokenKind::Comma
                        | TokenKind::Semicolon
                        | TokenKind::RightBrace
                        | TokenKind::RightParen
                        | TokenKind::RightSquare
                        | TokenKind::Eof
                ) || (!tokens.is_empty()
                    && token.leading_trivia.has_newline()
                    && !matches!(token.kind, TokenKind::Period | TokenKind::Operator))
                    || (token.is(TokenKind::LeftBrace)
                        && tokens.last().is_some_and(|t| !t.trailing_trivia.is_empty()));
                if stop {
                    break;
                }
            } else if token.is(TokenKind::Eof) {
                return Err(self.unbalanced(&tokens[0]));
            }
            match token.kind {
                TokenKind::LeftBrace | TokenKind::LeftParen | TokenKind::LeftSquare => depth += 1,
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightSquare => {
                    depth -= 1
                }
                _ => {}
            }
            tokens.push(self.bump());
        }
        if tokens.is_empty() {
            return Err(self.unexpected("an expression"));
        }
        Ok(classify_expr(tokens))
    }

    /// A parenthesised, bracketed or braced token run including its delimiters.
    fn parse_balanced(&mut self) -> Result<RawTokens, ParseError> {
        let open = self.bump();
        let mut depth = 1usize;
        let mut tokens = vec![open.clone()];
        while depth > 0 {
            let token = self.bump();
            match token.kind {
                TokenKind::Eof => return Err(self.unbalanced(&open)),
                TokenKind::LeftBrace | TokenKind::LeftParen | TokenKind::LeftSquare => depth += 1,
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightSquare => {
                    depth -= 1
                }
                _ => {}
            }
            tokens.push(token);
        }
        Ok(RawTokens::new(tokens))
    }
}

/// Net change of angle-bracket nesting contributed by an operator token.
fn angle_delta(text: &str) -> i32 {
    text.chars()
        .map(|c| match c {
            '<' => 1,
            '>' => -1,
            _ => 0,
        })
        .sum()
}

/// Index of the first token of `kind` at bracket depth zero within `tokens`.
fn find_top_level(tokens: &[Token], kind: TokenKind) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate() {
        if token.is(kind) && depth == 0 {
            return Some(i);
        }
        match token.kind {
            TokenKind::LeftBrace | TokenKind::LeftParen | TokenKind::LeftSquare => depth += 1,
            TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightSquare => depth -= 1,
            _ => {}
        }
    }
    None
}

fn is_bracketed(tokens: &[Token]) -> bool {
    tokens.len() >= 2
        && tokens[0].is(TokenKind::LeftSquare)
        && tokens[tokens.len() - 1].is(TokenKind::RightSquare)
        && find_top_level(&tokens[1..], TokenKind::RightSquare) == Some(tokens.len() - 2)
}

fn classify_type(mut tokens: Vec<Token>) -> TypeSyntax {
    if tokens.len() == 1 && tokens[0].is(TokenKind::Identifier) {
        return TypeSyntax::Identifier(tokens.remove(0));
    }
    if is_bracketed(&tokens) {
        let inner = &tokens[1..tokens.len() - 1];
        if let Some(colon) = find_top_level(inner, TokenKind::Colon).filter(|&i| i > 0) {
            if colon + 1 < inner.len() {
                return TypeSyntax::Dictionary(DictionaryType {
                    left_square: tokens[0].clone(),
                    key: Box::new(classify_type(inner[..colon].to_vec())),
                    colon: inner[colon].clone(),
                    value: Box::new(classify_type(inner[colon + 1..].to_vec())),
                    right_square: tokens[tokens.len() - 1].clone(),
                });
            }
        }
    }
    TypeSyntax::Raw(RawTokens::new(tokens))
}

fn classify_expr(mut tokens: Vec<Token>) -> ExprSyntax {
    if tokens.len() == 1 && tokens[0].is(TokenKind::StringLiteral) {
        return ExprSyntax::StringLiteral(tokens.remove(0));
    }
    if tokens.len() == 2 && tokens[0].is(TokenKind::Period) && tokens[1].is(TokenKind::Identifier) {
        let name = tokens.remove(1);
        let period = tokens.remove(0);
        return ExprSyntax::MemberAccess(MemberAccessExpr { period, name });
    }
    if is_bracketed(&tokens) {
        if let Some(dict) = classify_dictionary(&tokens) {
            return ExprSyntax::Dictionary(dict);
        }
    }
    ExprSyntax::Raw(RawTokens::new(tokens))
}

fn classify_dictionary(tokens: &[Token]) -> Option<DictionaryExpr> {
    let left_square = tokens[0].clone();
    let right_square = tokens[tokens.len() - 1].clone();
    let inner = &tokens[1..tokens.len() - 1];

    if let [colon] = inner {
        if colon.is(TokenKind::Colon) {
            return Some(DictionaryExpr {
                left_square,
                content: DictionaryContent::Empty {
                    colon: colon.clone(),
                },
                right_square,
            });
        }
    }

    let mut elements = Vec::new();
    let mut rest = inner;
    while !rest.is_empty() {
        let end = find_top_level(rest, TokenKind::Comma).unwrap_or(rest.len());
        let element = &rest[..end];
        let colon = find_top_level(element, TokenKind::Colon).filter(|&i| i > 0)?;
        if colon + 1 >= element.len() {
            return None;
        }
        elements.push(DictionaryElement {
            key: classify_expr(element[..colon].to_vec()),
            colon: element[colon].clone(),
            value: classify_expr(element[colon + 1..].to_vec()),
            trailing_comma: rest.get(end).cloned(),
        });
        rest = rest.get(end + 1..).unwrap_or_default();
    }
    if elements.is_empty() {
        return None;
    }
    Some(DictionaryExpr {
        left_square,
        content: DictionaryContent::Elements(elements),
        right_square,
    })
}
