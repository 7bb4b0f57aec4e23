use std::error::Error;
use std::fmt;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceCode};

use crate::syntax::{Decl, Span, Syntax};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

impl From<Severity> for miette::Severity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        }
    }
}

/// Stable identifier hosts use to deduplicate or suppress a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId {
    pub domain: String,
    pub id: String,
}

impl MessageId {
    pub fn new(domain: &str, id: &str) -> Self {
        Self {
            domain: domain.to_string(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.id)
    }
}

/// A catalog entry: anything that can be reported as a diagnostic.
pub trait DiagnosticMessage {
    fn message(&self) -> String;
    fn diagnostic_id(&self) -> MessageId;
    fn severity(&self) -> Severity;
}

/// A proposed edit. Never applied by the expansion itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixItChange {
    /// Replace a whole declaration.
    Replace { old: Box<Decl>, new: Box<Decl> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixIt {
    pub message: String,
    pub id: MessageId,
    pub changes: Vec<FixItChange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub id: MessageId,
    pub message: String,
    /// Source range of the node the diagnostic is attached to.
    pub span: Option<Span>,
    pub fix_its: Vec<FixIt>,
}

impl Diagnostic {
    pub fn new(node: &impl Syntax, message: &impl DiagnosticMessage) -> Self {
        Self {
            severity: message.severity(),
            id: message.diagnostic_id(),
            message: message.message(),
            span: node.span(),
            fix_its: Vec::new(),
        }
    }

    pub fn with_fix_it(mut self, fix_it: FixIt) -> Self {
        self.fix_its.push(fix_it);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Pair the diagnostic with the file it was raised in, ready for a miette report handler.
    pub fn with_source(&self, file_name: &str, source: &str) -> SourceDiagnostic {
        SourceDiagnostic {
            diagnostic: self.clone(),
            source: NamedSource::new(file_name, source.to_string()),
        }
    }

    /// Render as a plain-text miette report: the id, the message, the labelled source line
    /// and one `help:` line per fix-it.
    pub fn render(&self, file_name: &str, source: &str) -> Result<String, fmt::Error> {
        let mut out = String::new();
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .with_width(120)
            .render_report(&mut out, &self.with_source(file_name, source))?;
        Ok(out)
    }
}

/// A [`Diagnostic`] together with its source file.
#[derive(Debug)]
pub struct SourceDiagnostic {
    diagnostic: Diagnostic,
    source: NamedSource<String>,
}

impl fmt::Display for SourceDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic.message)
    }
}

impl Error for SourceDiagnostic {}

impl miette::Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic.id))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.diagnostic.severity.into())
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.diagnostic.fix_its.is_empty() {
            return None;
        }
        let help = self
            .diagnostic
            .fix_its
            .iter()
            .map(|fix_it| format!("{} [{}]", fix_it.message, fix_it.id))
            .collect::<Vec<_>>()
            .join("\n");
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diagnostic.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(self.diagnostic.message.clone()),
            span.start..span.end.max(span.start + 1),
        ))))
    }
}

/// Sink a macro reports diagnostics to during one expansion.
pub trait MacroExpansionContext {
    fn diagnose(&mut self, diagnostic: Diagnostic);
}

/// Keeps diagnostics in emission order.
#[derive(Debug, Default)]
pub struct CollectingContext {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl MacroExpansionContext for CollectingContext {
    fn diagnose(&mut self, diagnostic: Diagnostic) {
        log::debug!("diagnostic {}: {}", diagnostic.id, diagnostic.message);
        self.diagnostics.push(diagnostic);
    }
}
