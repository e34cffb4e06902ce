use markdown_mdast_compiler::{Extension, Options, Point};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Compiler settings kept in a TOML file.
///
/// ```toml
/// can_contain_eols = ["delete"]
///
/// [from]
/// line = 5
/// column = 1
/// offset = 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Extra node types in which line endings become text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub can_contain_eols: Vec<String>,
    /// Where the compiled markdown starts in its enclosing document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Point>,
}

impl Settings {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let settings: Settings =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(settings))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Compiler options equivalent to these settings.
    ///
    /// Extra `can_contain_eols` entries travel as one extension.
    pub fn to_options(&self) -> Options {
        let mut options = Options::new();
        if let Some(from) = self.from {
            options = options.start_at(from);
        }
        if !self.can_contain_eols.is_empty() {
            let extension = self
                .can_contain_eols
                .iter()
                .fold(Extension::new(), |extension, name| {
                    extension.can_contain_eol(name.as_str())
                });
            options = options.extension(extension);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_mdast_compiler::Compiler;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings {
            can_contain_eols: vec!["delete".to_string()],
            from: Some(Point::new(5, 1, 100)),
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Settings = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_empty_file_is_default_settings() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_from_toml() {
        let config_content = r#"
can_contain_eols = ["delete", "math"]

[from]
line = 3
column = 2
offset = 10
"#;

        let settings: Settings = toml::from_str(config_content).unwrap();

        assert_eq!(settings.can_contain_eols, ["delete", "math"]);
        assert_eq!(settings.from, Some(Point::new(3, 2, 10)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Settings::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_malformed_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "can_contain_eols = 3").unwrap();

        let error = Settings::load_from_path(&config_file).unwrap_err();

        assert!(matches!(error, ConfigError::ConfigParseError { .. }));
        assert!(error.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let settings = Settings {
            can_contain_eols: vec!["delete".to_string()],
            from: Some(Point::new(2, 4, 7)),
        };

        settings.save_to_path(&config_file).unwrap();
        let loaded = Settings::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_to_options_configures_compiler() {
        let settings = Settings {
            can_contain_eols: vec!["delete".to_string(), "math".to_string()],
            from: Some(Point::new(5, 1, 100)),
        };

        let options = settings.to_options();
        assert_eq!(options.from, Some(Point::new(5, 1, 100)));
        assert_eq!(options.extensions.len(), 1);

        let compiler = Compiler::new(options);
        assert!(compiler.config().can_contain_eols("delete"));
        assert!(compiler.config().can_contain_eols("math"));
        assert!(compiler.config().can_contain_eols("paragraph"));
    }

    #[test]
    fn test_default_settings_add_nothing() {
        let options = Settings::default().to_options();
        assert_eq!(options.from, None);
        assert!(options.extensions.is_empty());
    }
}
