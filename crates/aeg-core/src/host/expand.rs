use crate::diagnostics::{
    CollectingContext, Diagnostic, DiagnosticMessage, MacroExpansionContext, MessageId, Severity,
};
use crate::error::HostError;
use crate::parse::parse_source;
use crate::syntax::{
    AttributeSyntax, Decl, ExtensionDecl, MemberBlockItem, SourceFile, Syntax, Token, Trivia,
    TypeSyntax,
};

use super::MacroRegistry;

/// Result of expanding every attached macro in a source file.
#[derive(Debug)]
pub struct Expansion {
    /// The file with expanded macro attributes removed and generated extensions inserted
    /// after the declarations they were attached to.
    pub expanded_source: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Diagnostics raised by the host itself.
enum HostMessage {
    ExpansionFailed(String),
    /// Macro name; attachments below the top level are left unexpanded.
    NestedAttachment(String),
}

impl DiagnosticMessage for HostMessage {
    fn message(&self) -> String {
        match self {
            HostMessage::ExpansionFailed(reason) => reason.clone(),
            HostMessage::NestedAttachment(name) => format!(
                "'@{name}' is only expanded on top-level declarations; move the type to file scope"
            ),
        }
    }

    fn diagnostic_id(&self) -> MessageId {
        match self {
            HostMessage::ExpansionFailed(_) => MessageId::new("aeg.host", "expansionFailed"),
            HostMessage::NestedAttachment(_) => MessageId::new("aeg.host", "nestedAttachment"),
        }
    }

    fn severity(&self) -> Severity {
        match self {
            HostMessage::ExpansionFailed(_) => Severity::Error,
            HostMessage::NestedAttachment(_) => Severity::Warning,
        }
    }
}

/// Expand all registered macros attached to top-level declaration groups in `source`.
///
/// Every attachment site is expanded on its own; nothing is shared between expansions.
/// Macros attached to nested declarations stay in place and get a `nestedAttachment` warning.
pub fn expand_source(source: &str, registry: &MacroRegistry) -> Result<Expansion, HostError> {
    let file = parse_source(source)?;
    let mut items = Vec::with_capacity(file.items.len());
    let mut diagnostics = Vec::new();

    for item in file.items {
        let (item, extensions) = expand_item(item, registry, &mut diagnostics);
        report_nested_attachments(&item.decl, registry, &mut diagnostics);
        items.push(item);
        items.extend(extensions.into_iter().map(|mut extension| {
            extension.set_leading_trivia(Trivia::newlines(2));
            MemberBlockItem::new(Decl::Extension(extension))
        }));
    }

    let expanded = SourceFile {
        items,
        end_of_file: file.end_of_file,
    };
    Ok(Expansion {
        expanded_source: expanded.to_source(),
        diagnostics,
    })
}

fn expand_item(
    mut item: MemberBlockItem,
    registry: &MacroRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) -> (MemberBlockItem, Vec<ExtensionDecl>) {
    if !item.decl.is_decl_group() {
        return (item, Vec::new());
    }
    let attached: Vec<AttributeSyntax> = item
        .decl
        .attributes()
        .iter()
        .filter(|attribute| registry.contains(attribute.name_text()))
        .cloned()
        .collect();
    if attached.is_empty() {
        return (item, Vec::new());
    }

    let mut extensions = Vec::new();
    for attribute in &attached {
        let Some(mac) = registry.get(attribute.name_text()) else {
            continue;
        };
        log::debug!(
            "expanding @{} on {}",
            attribute.name_text(),
            item.decl.kind_name()
        );
        let conforming_to = requested_conformances(&item.decl, mac.conformance());
        let mut context = CollectingContext::new();
        match mac.expansion(attribute, &item.decl, &conforming_to, &mut context) {
            Ok(generated) => extensions.extend(generated),
            Err(err) => {
                log::warn!("@{} failed: {err}", attribute.name_text());
                context.diagnose(Diagnostic::new(
                    attribute,
                    &HostMessage::ExpansionFailed(err.to_string()),
                ));
            }
        }
        diagnostics.extend(context.into_diagnostics());
    }

    while let Some(index) = item
        .decl
        .attributes()
        .iter()
        .position(|attribute| registry.contains(attribute.name_text()))
    {
        remove_attribute(&mut item.decl, index);
    }
    (item, extensions)
}

/// Warn about registered macros attached to declarations nested inside `decl`.
fn report_nested_attachments(decl: &Decl, registry: &MacroRegistry, diagnostics: &mut Vec<Diagnostic>) {
    let Some(block) = decl.member_block() else {
        return;
    };
    for member in &block.members {
        if !member.decl.is_decl_group() {
            continue;
        }
        for attribute in member
            .decl
            .attributes()
            .iter()
            .filter(|attribute| registry.contains(attribute.name_text()))
        {
            log::warn!(
                "@{} on a nested {} is not expanded",
                attribute.name_text(),
                member.decl.kind_name()
            );
            diagnostics.push(Diagnostic::new(
                attribute,
                &HostMessage::NestedAttachment(attribute.name_text().to_string()),
            ));
        }
        report_nested_attachments(&member.decl, registry, diagnostics);
    }
}

/// The macro's conformance, unless the declaration already lists it.
fn requested_conformances(decl: &Decl, conformance: &str) -> Vec<TypeSyntax> {
    if decl
        .inheritance_clause()
        .is_some_and(|clause| clause.contains(conformance))
    {
        return Vec::new();
    }
    Token::identifier(conformance)
        .map(TypeSyntax::Identifier)
        .into_iter()
        .collect()
}

/// Remove an attribute; the token that follows inherits its leading trivia if it starts a line.
fn remove_attribute(decl: &mut Decl, index: usize) {
    let tokens_before: usize = decl.attributes()[..index]
        .iter()
        .map(|attribute| attribute.tokens().len())
        .sum();
    let removed = decl.attributes_mut().remove(index);
    let leading = removed.leading_trivia();

    let mut position = 0;
    decl.for_each_token_mut(&mut |token| {
        if position == tokens_before && token.leading_trivia.has_newline() {
            token.leading_trivia = leading.clone();
        }
        position += 1;
    });
}
