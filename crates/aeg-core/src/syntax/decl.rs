use super::{ExprSyntax, RawTokens, Syntax, Token, TokenKind, TypeSyntax, impl_syntax};

/// `@Name` or `@Name(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSyntax {
    pub at_sign: Token,
    pub name: Token,
    /// Parenthesised arguments including the parentheses.
    pub arguments: Option<RawTokens>,
}

impl_syntax!(AttributeSyntax {
    at_sign,
    name,
    arguments
});

impl AttributeSyntax {
    pub fn name_text(&self) -> &str {
        self.name.identifier_text()
    }
}

/// `public`, `static`, `private(set)`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclModifier {
    pub name: Token,
    pub detail: Option<RawTokens>,
}

impl_syntax!(DeclModifier { name, detail });

impl DeclModifier {
    pub fn new(name: Token) -> Self {
        Self { name, detail: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritedType {
    pub ty: TypeSyntax,
    pub trailing_comma: Option<Token>,
}

impl_syntax!(InheritedType { ty, trailing_comma });

/// `: String, Codable`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceClause {
    pub colon: Token,
    pub inherited_types: Vec<InheritedType>,
}

impl_syntax!(InheritanceClause {
    colon,
    inherited_types
});

impl InheritanceClause {
    /// Whether a type named `name` is listed, bare or module-qualified.
    pub fn contains(&self, name: &str) -> bool {
        self.inherited_types
            .iter()
            .any(|inherited| inherited.ty.nominal_name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBlockItem {
    pub decl: Decl,
    pub semicolon: Option<Token>,
}

impl_syntax!(MemberBlockItem { decl, semicolon });

impl MemberBlockItem {
    pub fn new(decl: Decl) -> Self {
        Self {
            decl,
            semicolon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBlock {
    pub left_brace: Token,
    pub members: Vec<MemberBlockItem>,
    pub right_brace: Token,
}

impl_syntax!(MemberBlock {
    left_brace,
    members,
    right_brace
});

/// One name of a `case` list: `a`, `b(Int)`, `c = "c"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseElement {
    pub name: Token,
    pub associated_value: Option<RawTokens>,
    pub raw_value: Option<InitializerClause>,
    pub trailing_comma: Option<Token>,
}

impl_syntax!(EnumCaseElement {
    name,
    associated_value,
    raw_value,
    trailing_comma
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Vec<DeclModifier>,
    pub case_keyword: Token,
    pub elements: Vec<EnumCaseElement>,
}

impl_syntax!(EnumCaseDecl {
    attributes,
    modifiers,
    case_keyword,
    elements
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub colon: Token,
    pub ty: TypeSyntax,
}

impl_syntax!(TypeAnnotation { colon, ty });

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerClause {
    pub equal: Token,
    pub value: ExprSyntax,
}

impl_syntax!(InitializerClause { equal, value });

/// A single-binding `var`/`let`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Vec<DeclModifier>,
    pub binding_specifier: Token,
    pub pattern: Token,
    pub type_annotation: Option<TypeAnnotation>,
    pub initializer: Option<InitializerClause>,
    pub accessor_block: Option<RawTokens>,
}

impl_syntax!(VariableDecl {
    attributes,
    modifiers,
    binding_specifier,
    pattern,
    type_annotation,
    initializer,
    accessor_block
});

impl VariableDecl {
    pub fn name(&self) -> &str {
        self.pattern.identifier_text()
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m.name.text == "static")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Vec<DeclModifier>,
    pub enum_keyword: Token,
    pub name: Token,
    pub generic_parameter_clause: Option<RawTokens>,
    pub inheritance_clause: Option<InheritanceClause>,
    pub generic_where_clause: Option<RawTokens>,
    pub member_block: MemberBlock,
}

impl_syntax!(EnumDecl {
    attributes,
    modifiers,
    enum_keyword,
    name,
    generic_parameter_clause,
    inheritance_clause,
    generic_where_clause,
    member_block
});

impl EnumDecl {
    /// Last token before the inheritance clause position (the name or the generic clause).
    pub fn header_end_mut(&mut self) -> &mut Token {
        match self
            .generic_parameter_clause
            .as_mut()
            .and_then(|g| g.tokens.last_mut())
        {
            Some(token) => token,
            None => &mut self.name,
        }
    }
}

/// `struct`, `class`, `actor` or `protocol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    pub name: Token,
    pub generic_parameter_clause: Option<RawTokens>,
    pub inheritance_clause: Option<InheritanceClause>,
    pub generic_where_clause: Option<RawTokens>,
    pub member_block: MemberBlock,
}

impl_syntax!(TypeDecl {
    attributes,
    modifiers,
    keyword,
    name,
    generic_parameter_clause,
    inheritance_clause,
    generic_where_clause,
    member_block
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Vec<DeclModifier>,
    pub extension_keyword: Token,
    pub extended_type: TypeSyntax,
    pub inheritance_clause: Option<InheritanceClause>,
    pub generic_where_clause: Option<RawTokens>,
    pub member_block: MemberBlock,
}

impl_syntax!(ExtensionDecl {
    attributes,
    modifiers,
    extension_keyword,
    extended_type,
    inheritance_clause,
    generic_where_clause,
    member_block
});

/// Any declaration or statement the model does not look into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Vec<DeclModifier>,
    pub body: RawTokens,
}

impl_syntax!(RawDecl {
    attributes,
    modifiers,
    body
});

/// Closed set of declaration kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Enum(EnumDecl),
    Type(TypeDecl),
    Extension(ExtensionDecl),
    EnumCase(EnumCaseDecl),
    Variable(VariableDecl),
    Raw(RawDecl),
}

impl Decl {
    pub fn as_enum(&self) -> Option<&EnumDecl> {
        match self {
            Decl::Enum(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn as_enum_case(&self) -> Option<&EnumCaseDecl> {
        match self {
            Decl::EnumCase(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn is_enum_case(&self) -> bool {
        matches!(self, Decl::EnumCase(_))
    }

    pub fn attributes(&self) -> &[AttributeSyntax] {
        match self {
            Decl::Enum(d) => &d.attributes,
            Decl::Type(d) => &d.attributes,
            Decl::Extension(d) => &d.attributes,
            Decl::EnumCase(d) => &d.attributes,
            Decl::Variable(d) => &d.attributes,
            Decl::Raw(d) => &d.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Vec<AttributeSyntax> {
        match self {
            Decl::Enum(d) => &mut d.attributes,
            Decl::Type(d) => &mut d.attributes,
            Decl::Extension(d) => &mut d.attributes,
            Decl::EnumCase(d) => &mut d.attributes,
            Decl::Variable(d) => &mut d.attributes,
            Decl::Raw(d) => &mut d.attributes,
        }
    }

    /// Inheritance clause of a declaration group.
    pub fn inheritance_clause(&self) -> Option<&InheritanceClause> {
        match self {
            Decl::Enum(d) => d.inheritance_clause.as_ref(),
            Decl::Type(d) => d.inheritance_clause.as_ref(),
            Decl::Extension(d) => d.inheritance_clause.as_ref(),
            _ => None,
        }
    }

    /// Member block of a declaration group.
    pub fn member_block(&self) -> Option<&MemberBlock> {
        match self {
            Decl::Enum(d) => Some(&d.member_block),
            Decl::Type(d) => Some(&d.member_block),
            Decl::Extension(d) => Some(&d.member_block),
            _ => None,
        }
    }

    /// Human-readable kind, used in log output.
    pub fn kind_name(&self) -> &str {
        match self {
            Decl::Enum(_) => "enum",
            Decl::Type(d) => &d.keyword.text,
            Decl::Extension(_) => "extension",
            Decl::EnumCase(_) => "case",
            Decl::Variable(d) => &d.binding_specifier.text,
            Decl::Raw(_) => "declaration",
        }
    }

    /// Whether the declaration has a member block macros can attach to.
    pub fn is_decl_group(&self) -> bool {
        matches!(self, Decl::Enum(_) | Decl::Type(_) | Decl::Extension(_))
    }
}

impl Syntax for Decl {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        match self {
            Decl::Enum(d) => d.for_each_token(f),
            Decl::Type(d) => d.for_each_token(f),
            Decl::Extension(d) => d.for_each_token(f),
            Decl::EnumCase(d) => d.for_each_token(f),
            Decl::Variable(d) => d.for_each_token(f),
            Decl::Raw(d) => d.for_each_token(f),
        }
    }

    fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Token)) {
        match self {
            Decl::Enum(d) => d.for_each_token_mut(f),
            Decl::Type(d) => d.for_each_token_mut(f),
            Decl::Extension(d) => d.for_each_token_mut(f),
            Decl::EnumCase(d) => d.for_each_token_mut(f),
            Decl::Variable(d) => d.for_each_token_mut(f),
            Decl::Raw(d) => d.for_each_token_mut(f),
        }
    }
}

/// A parsed file: top-level items followed by the end-of-file token carrying final trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub items: Vec<MemberBlockItem>,
    pub end_of_file: Token,
}

impl_syntax!(SourceFile { items, end_of_file });

impl SourceFile {
    pub fn new(items: Vec<MemberBlockItem>) -> Self {
        Self {
            items,
            end_of_file: Token::new(TokenKind::Eof, ""),
        }
    }
}
