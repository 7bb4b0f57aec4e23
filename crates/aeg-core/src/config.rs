use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Project configuration loaded from `.aeg.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AegConfig {
    /// Protocol the generated members conform the enum to.
    pub conformance: String,
    pub fixit: FixItConfig,
}

impl Default for AegConfig {
    fn default() -> Self {
        Self {
            conformance: DEFAULT_CONFORMANCE.to_string(),
            fixit: FixItConfig::default(),
        }
    }
}

/// Options for the replacement (fix-it) macro.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FixItConfig {
    /// Add `: <conformance>` to enums that have no inheritance clause at all.
    pub insert_missing_inheritance: bool,
}

pub const DEFAULT_CONFORMANCE: &str = "AppEnum";

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".aeg.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<AegConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: AegConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# aeg configuration
conformance: AppEnum   # protocol added by @AppEnumGen / @AppEnumGenFixIt

fixit:
  # also add `: AppEnum` to enums declared without any inheritance clause
  insert_missing_inheritance: false
"#
}
