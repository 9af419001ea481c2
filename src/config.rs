use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One language the editor offers for localized text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSpec {
    /// Language code used as the key in localized text maps ("en").
    pub code: String,
    /// Human-readable name shown in the language picker ("English").
    pub name: String,
}

impl LanguageSpec {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Languages offered for localized text entry. The first entry is the
    /// initially selected language.
    pub languages: Vec<LanguageSpec>,
    pub data: DataConfig,
}

/// Data directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            languages: vec![
                LanguageSpec::new("en", "English"),
                LanguageSpec::new("es", "Spanish"),
            ],
            data: DataConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { data_dir: None }
    }
}

impl EditorConfig {
    /// Load configuration from `~/.config/caseweaver/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("caseweaver"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("caseweaver").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.languages.len(), 2);
        assert_eq!(config.languages[0], LanguageSpec::new("en", "English"));
        assert_eq!(config.languages[1], LanguageSpec::new("es", "Spanish"));
        assert!(config.data.data_dir.is_none());
    }

    #[test]
    fn test_config_load_missing_file() {
        // Should return defaults without panicking
        let config = EditorConfig::load();
        assert!(!config.languages.is_empty());
    }

    #[test]
    fn test_data_dir_default() {
        let config = EditorConfig::default();
        let dir = config.data_dir();
        assert!(dir.to_string_lossy().contains("caseweaver") || dir == PathBuf::from("data"));
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = EditorConfig::default();
        config.data.data_dir = Some(PathBuf::from("/tmp/custom"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/custom"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EditorConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: EditorConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.languages, config.languages);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: EditorConfig = toml::from_str("[data]\ndata_dir = \"/tmp/d\"").unwrap();
        assert_eq!(config.data.data_dir, Some(PathBuf::from("/tmp/d")));
        // Unspecified sections fall back to defaults.
        assert_eq!(config.languages.len(), 2);
    }
}
