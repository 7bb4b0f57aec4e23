use crate::diagnostics::{Diagnostic, FixItChange};
use crate::error::HostError;
use crate::syntax::{Span, Syntax};

/// Apply every fix-it attached to `diagnostics` to `source`, as a user accepting them would.
///
/// A replacement swaps the old node's text (without its outer trivia) for the new node's.
pub fn apply_fix_its(source: &str, diagnostics: &[Diagnostic]) -> Result<String, HostError> {
    let mut edits: Vec<(Span, String)> = Vec::new();
    for fix_it in diagnostics.iter().flat_map(|d| &d.fix_its) {
        for change in &fix_it.changes {
            match change {
                FixItChange::Replace { old, new } => {
                    let span = old
                        .span()
                        .ok_or_else(|| HostError::MissingSpan(fix_it.id.to_string()))?;
                    edits.push((span, new.trimmed_source()));
                }
            }
        }
    }

    edits.sort_by_key(|(span, _)| span.start);
    if let Some(pair) = edits.windows(2).find(|pair| pair[0].0.end > pair[1].0.start) {
        return Err(HostError::OverlappingFixIts(pair[1].0.start));
    }

    let mut out = source.to_string();
    for (span, text) in edits.iter().rev() {
        log::debug!("replacing bytes {}..{}", span.start, span.end);
        out.replace_range(span.start..span.end, text);
    }
    Ok(out)
}
