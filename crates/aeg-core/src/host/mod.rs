//! A minimal stand-in for the compiler's macro driver: finds attached macros in a source
//! file, runs them, and applies the fix-its they suggest on request.

mod expand;
mod fixit;

use indexmap::IndexMap;

use crate::ExtensionMacro;

pub use expand::{Expansion, expand_source};
pub use fixit::apply_fix_its;

/// Macros available to the host, in registration order.
#[derive(Default)]
pub struct MacroRegistry {
    macros: IndexMap<String, Box<dyn ExtensionMacro>>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a macro under its own name, replacing any previous macro of that name.
    pub fn register(&mut self, mac: Box<dyn ExtensionMacro>) {
        let name = mac.name().to_string();
        if self.macros.insert(name.clone(), mac).is_some() {
            log::warn!("macro `{name}` registered twice; keeping the last registration");
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn ExtensionMacro> {
        self.macros.get(name).map(|mac| mac.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.macros.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
