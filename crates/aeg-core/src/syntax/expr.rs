use super::{RawTokens, Syntax, Token, TokenKind, impl_syntax};

/// A type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntax {
    /// `String`, `AppEnum`
    Identifier(Token),
    /// `[Key: Value]`
    Dictionary(DictionaryType),
    /// Anything else (`Foo.Bar`, `Array<Int>`, `@unchecked Sendable`, ...), kept verbatim.
    Raw(RawTokens),
}

impl TypeSyntax {
    /// The identifier name, for plain identifier types only.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            TypeSyntax::Identifier(name) => Some(name.identifier_text()),
            _ => None,
        }
    }

    /// The last component of a plain or member type name: `AppEnum` for both `AppEnum`
    /// and `SwiftUI.AppEnum`.
    pub fn nominal_name(&self) -> Option<&str> {
        match self {
            TypeSyntax::Identifier(name) => Some(name.identifier_text()),
            TypeSyntax::Raw(raw) => {
                let tokens = &raw.tokens;
                let is_member_path = tokens.len() % 2 == 1
                    && tokens.iter().enumerate().all(|(i, token)| {
                        token.is(if i % 2 == 0 {
                            TokenKind::Identifier
                        } else {
                            TokenKind::Period
                        })
                    });
                is_member_path
                    .then(|| tokens.last().map(Token::identifier_text))
                    .flatten()
            }
            TypeSyntax::Dictionary(_) => None,
        }
    }
}

impl Syntax for TypeSyntax {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        match self {
            TypeSyntax::Identifier(token) => token.for_each_token(f),
            TypeSyntax::Dictionary(dict) => dict.for_each_token(f),
            TypeSyntax::Raw(raw) => raw.for_each_token(f),
        }
    }

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        match self {
            TypeSyntax::Identifier(token) => token.for_each_token_mut(f),
            TypeSyntax::Dictionary(dict) => dict.for_each_token_mut(f),
            TypeSyntax::Raw(raw) => raw.for_each_token_mut(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryType {
    pub left_square: Token,
    pub key: Box<TypeSyntax>,
    pub colon: Token,
    pub value: Box<TypeSyntax>,
    pub right_square: Token,
}

impl_syntax!(DictionaryType {
    left_square,
    key,
    colon,
    value,
    right_square
});

/// An expression. Only the shapes the generator builds are modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprSyntax {
    StringLiteral(Token),
    MemberAccess(MemberAccessExpr),
    Dictionary(DictionaryExpr),
    Raw(RawTokens),
}

impl Syntax for ExprSyntax {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        match self {
            ExprSyntax::StringLiteral(token) => token.for_each_token(f),
            ExprSyntax::MemberAccess(access) => access.for_each_token(f),
            ExprSyntax::Dictionary(dict) => dict.for_each_token(f),
            ExprSyntax::Raw(raw) => raw.for_each_token(f),
        }
    }

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        match self {
            ExprSyntax::StringLiteral(token) => token.for_each_token_mut(f),
            ExprSyntax::MemberAccess(access) => access.for_each_token_mut(f),
            ExprSyntax::Dictionary(dict) => dict.for_each_token_mut(f),
            ExprSyntax::Raw(raw) => raw.for_each_token_mut(f),
        }
    }
}

/// Implicit member access: `.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccessExpr {
    pub period: Token,
    pub name: Token,
}

impl_syntax!(MemberAccessExpr { period, name });

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryExpr {
    pub left_square: Token,
    pub content: DictionaryContent,
    pub right_square: Token,
}

impl_syntax!(DictionaryExpr {
    left_square,
    content,
    right_square
});

impl DictionaryExpr {
    pub fn elements(&self) -> &[DictionaryElement] {
        match &self.content {
            DictionaryContent::Empty { .. } => &[],
            DictionaryContent::Elements(elements) => elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryContent {
    /// The `:` of `[:]`.
    Empty { colon: Token },
    Elements(Vec<DictionaryElement>),
}

impl Syntax for DictionaryContent {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        match self {
            DictionaryContent::Empty { colon } => colon.for_each_token(f),
            DictionaryContent::Elements(elements) => elements.for_each_token(f),
        }
    }

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        match self {
            DictionaryContent::Empty { colon } => colon.for_each_token_mut(f),
            DictionaryContent::Elements(elements) => elements.for_each_token_mut(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryElement {
    pub key: ExprSyntax,
    pub colon: Token,
    pub value: ExprSyntax,
    pub trailing_comma: Option<Token>,
}

impl_syntax!(DictionaryElement {
    key,
    colon,
    value,
    trailing_comma
});
