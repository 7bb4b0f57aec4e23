pub mod lexer;
mod parser;

use crate::error::ParseError;
use crate::syntax::{Decl, SourceFile};
use parser::Parser;

/// Parse a Swift source file into the declaration model.
///
/// Only the declaration shapes macros attach to are modelled in detail; everything else
/// is kept as raw tokens so the file prints back unchanged.
pub fn parse_source(source: &str) -> Result<SourceFile, ParseError> {
    let tokens = lexer::tokenize(source)?;
    let file = Parser::new(source, tokens).parse_source_file()?;
    log::debug!("parsed {} top-level items", file.items.len());
    Ok(file)
}

/// Parse exactly one declaration.
pub fn parse_decl(source: &str) -> Result<Decl, ParseError> {
    let mut file = parse_source(source)?;
    if file.items.len() != 1 {
        return Err(ParseError::DeclarationCount(file.items.len()));
    }
    Ok(file.items.remove(0).decl)
}
