//! Shader core configuration with TOML preset support.
//!
//! Target profile, diagnostics reporting, and device limits live here.
//! Options serialize to/from TOML so a renderer can keep per-target presets
//! (e.g. `desktop.toml`, `gles2.toml`) next to its assets.

mod limits;
mod profile;
mod validation;

use std::path::Path;

pub use limits::LimitsOptions;
pub use profile::ProfileOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use validation::ValidationOptions;

use crate::error::TesseraError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[profile]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Target profile switches.
    pub profile: ProfileOptions,
    /// Diagnostics reporting.
    pub validation: ValidationOptions,
    /// Device limits.
    pub limits: LimitsOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, TesseraError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| TesseraError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), TesseraError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TesseraError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(TesseraError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[profile]
restricted = true
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert!(opts.profile.restricted);
        assert!(!opts.profile.linearize_srgb);
        assert!(opts.validation.report_warnings);
        assert_eq!(opts.limits.max_color_attachments, 4);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("tessera-options-{}", std::process::id()));
        let mut opts = Options::default();
        opts.limits.max_color_attachments = 8;

        opts.save(&dir.join("presets").join("deferred.toml")).unwrap();
        let loaded = Options::load(&dir.join("presets/deferred.toml")).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(Options::list_presets(&dir.join("presets")), ["deferred"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let dir = std::env::temp_dir()
            .join(format!("tessera-bad-options-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[limits]\nmax_color_attachments = \"four\"\n")
            .unwrap();

        assert!(matches!(
            Options::load(&path),
            Err(TesseraError::OptionsParse(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("profile"));
        assert!(props.contains_key("validation"));
        assert!(props.contains_key("limits"));

        let profile = &props["profile"]["properties"];
        assert!(profile.get("restricted").is_some());
        assert!(profile.get("linearize_srgb").is_some());
    }
}
