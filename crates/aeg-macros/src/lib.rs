pub mod case_extractor;
pub mod diagnostic;
pub mod emitters;
pub mod plugin;
pub mod synthesizer;
pub mod validate;

pub use emitters::extension::AppEnumGenMacro;
pub use emitters::replacement::AppEnumGenFixItMacro;
pub use plugin::{PROVIDED_MACROS, plugin};
