pub mod decl;
pub mod expr;
pub mod token;
pub mod trivia;

pub use decl::*;
pub use expr::*;
pub use token::{Span, Token, TokenKind};
pub use trivia::{Trivia, TriviaPiece};

/// Common behaviour of every syntax node: ordered access to its tokens.
///
/// Printing is derived from the token walk, so a parsed tree prints back to its exact
/// source text, and edits to trivia only ever touch tokens.
pub trait Syntax {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token));

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token));

    fn tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.for_each_token(&mut |t| tokens.push(t));
        tokens
    }

    fn first_token(&self) -> Option<&Token> {
        self.tokens().into_iter().next()
    }

    fn last_token(&self) -> Option<&Token> {
        self.tokens().into_iter().last()
    }

    /// Full text including all trivia.
    fn to_source(&self) -> String {
        let mut out = String::new();
        self.for_each_token(&mut |t| out.push_str(&t.to_string()));
        out
    }

    /// Text without the first token's leading and the last token's trailing trivia.
    fn trimmed_source(&self) -> String {
        let tokens = self.tokens();
        let last = tokens.len().saturating_sub(1);
        let mut out = String::new();
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                out.push_str(&token.leading_trivia.to_string());
            }
            out.push_str(&token.text);
            if i < last {
                out.push_str(&token.trailing_trivia.to_string());
            }
        }
        out
    }

    /// Source range covered by the node's tokens, if it was parsed.
    fn span(&self) -> Option<Span> {
        let mut spans = self.tokens().into_iter().filter_map(|t| t.span);
        let first = spans.next()?;
        Some(spans.fold(first, Span::to))
    }

    fn leading_trivia(&self) -> Trivia {
        self.first_token()
            .map(|t| t.leading_trivia.clone())
            .unwrap_or_default()
    }

    fn set_leading_trivia(&mut self, trivia: Trivia) {
        let mut first = true;
        self.for_each_token_mut(&mut |t| {
            if first {
                t.leading_trivia = trivia.clone();
                first = false;
            }
        });
    }

    fn trailing_trivia(&self) -> Trivia {
        self.last_token()
            .map(|t| t.trailing_trivia.clone())
            .unwrap_or_default()
    }

    fn set_trailing_trivia(&mut self, trivia: Trivia) {
        let count = self.tokens().len();
        let mut index = 0;
        self.for_each_token_mut(&mut |t| {
            index += 1;
            if index == count {
                t.trailing_trivia = trivia.clone();
            }
        });
    }

    /// Strip spans so the node compares equal to a freshly built one.
    fn detach(&mut self) {
        self.for_each_token_mut(&mut |t| t.span = None);
    }
}

impl Syntax for Token {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(self)
    }

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        f(self)
    }
}

impl<T: Syntax> Syntax for Option<T> {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        if let Some(node) = self {
            node.for_each_token(f);
        }
    }

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        if let Some(node) = self {
            node.for_each_token_mut(f);
        }
    }
}

impl<T: Syntax> Syntax for Vec<T> {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        for node in self {
            node.for_each_token(f);
        }
    }

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        for node in self {
            node.for_each_token_mut(f);
        }
    }
}

impl<T: Syntax> Syntax for Box<T> {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        self.as_ref().for_each_token(f)
    }

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        self.as_mut().for_each_token_mut(f)
    }
}

/// Implement [`Syntax`] for a struct by walking the listed fields in source order.
macro_rules! impl_syntax {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::syntax::Syntax for $ty {
            fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a $crate::syntax::Token)) {
                $( $crate::syntax::Syntax::for_each_token(&self.$field, f); )*
            }

            fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut $crate::syntax::Token)) {
                $( $crate::syntax::Syntax::for_each_token_mut(&mut self.$field, f); )*
            }
        }
    };
}
pub(crate) use impl_syntax;

/// Tokens kept verbatim: attribute arguments, generic clauses, function bodies, ...
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTokens {
    pub tokens: Vec<Token>,
}

impl RawTokens {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl_syntax!(RawTokens { tokens });
