use std::path::{Path, PathBuf};

use design_tokens_core::UnitConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "design-tokens.toml";

/// Everything one build run needs. Loaded from `design-tokens.toml`; every
/// key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Main token document.
    pub source: PathBuf,
    /// Text token document, merged into every namespace.
    pub text_source: PathBuf,
    /// One sub-directory per namespace is written here.
    pub target_dir: PathBuf,
    pub units: UnitConfig,
    /// Per-namespace settings keyed by lower-cased namespace name.
    pub namespaces: IndexMap<String, NamespaceSettings>,
}
impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            source: PathBuf::from("tokens/core.json"),
            text_source: PathBuf::from("tokens/font.json"),
            target_dir: PathBuf::from("css"),
            units: UnitConfig::default(),
            namespaces: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceSettings {
    /// Also emit `tokens.js` and `tokens.d.ts` with the text tokens.
    pub text: bool,
    /// Shell command run after the namespace has been built.
    pub script: Option<String>,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given. Otherwise loads [`DEFAULT_CONFIG_PATH`] if it
    /// exists and falls back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let UnitConfig {
            base_font_size,
            base_screen_width,
        } = self.units;
        if base_font_size > 0.0 && base_screen_width > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidUnits {
                font_size: base_font_size,
                screen_width: base_screen_width,
            })
        }
    }

    pub fn namespace(&self, name: &str) -> Option<&NamespaceSettings> {
        self.namespaces.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config: BuildConfig = toml::from_str("").unwrap();
        assert_eq!(config, BuildConfig::default());
        assert_eq!(config.units.base_font_size, 16.0);
        assert_eq!(config.units.base_screen_width, 375.0);
    }

    #[test]
    fn full_file() {
        let config: BuildConfig = toml::from_str(
            r#"
            source = "design/core.json"
            target_dir = "dist"

            [units]
            base_font_size = 10

            [namespaces.button]
            text = true
            script = "echo done"

            [namespaces.card]
            "#,
        )
        .unwrap();
        assert_eq!(config.source, PathBuf::from("design/core.json"));
        assert_eq!(config.text_source, PathBuf::from("tokens/font.json"));
        assert_eq!(config.target_dir, PathBuf::from("dist"));
        assert_eq!(config.units.base_font_size, 10.0);
        assert_eq!(config.units.base_screen_width, 375.0);
        let button = config.namespace("button").unwrap();
        assert!(button.text);
        assert_eq!(button.script.as_deref(), Some("echo done"));
        assert_eq!(config.namespace("card"), Some(&NamespaceSettings::default()));
        assert_eq!(config.namespace("Button"), None);
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            BuildConfig::load_or_default(Some(&missing)),
            Err(ConfigError::Read { path, .. }) if path == missing
        ));
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "source = [").unwrap();
        assert!(matches!(
            BuildConfig::load(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn units_must_be_positive() {
        let mut config = BuildConfig::default();
        assert!(config.validate().is_ok());
        config.units.base_screen_width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUnits { .. })
        ));
    }
}
