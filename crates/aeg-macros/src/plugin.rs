use aeg_core::config::AegConfig;
use aeg_core::host::MacroRegistry;

use crate::emitters::extension::AppEnumGenMacro;
use crate::emitters::replacement::AppEnumGenFixItMacro;

/// Names of the macros this plugin provides, in registration order.
pub const PROVIDED_MACROS: [&str; 2] = [AppEnumGenMacro::NAME, AppEnumGenFixItMacro::NAME];

/// Register both AppEnum macros, configured from `config`.
pub fn plugin(config: &AegConfig) -> MacroRegistry {
    let mut registry = MacroRegistry::new();
    registry.register(Box::new(AppEnumGenMacro::new(&config.conformance)));
    registry.register(Box::new(AppEnumGenFixItMacro::new(
        &config.conformance,
        config.fixit.insert_missing_inheritance,
    )));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_exactly_both_macros() {
        let registry = plugin(&AegConfig::default());
        assert_eq!(registry.names().collect::<Vec<_>>(), PROVIDED_MACROS);
    }

    #[test]
    fn test_conformance_from_config() {
        let config: AegConfig = serde_yaml_ng::from_str("conformance: AppEntityEnum\n").unwrap();
        let registry = plugin(&config);
        for name in PROVIDED_MACROS {
            assert_eq!(registry.get(name).unwrap().conformance(), "AppEntityEnum");
        }
    }
}
