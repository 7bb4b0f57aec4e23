pub mod extension;
pub mod replacement;

use aeg_core::error::MacroError;
use aeg_core::syntax::EnumDecl;

use crate::case_extractor::extract_cases;
use crate::synthesizer::{SynthesizedMembers, synthesize};

/// Extract the cases of `enum_decl` and synthesize its display members at `indent`.
pub fn synthesize_for(enum_decl: &EnumDecl, indent: &str) -> Result<SynthesizedMembers, MacroError> {
    let cases = extract_cases(&enum_decl.member_block);
    synthesize(&enum_decl.name, &cases, indent)
}
