use crate::schema::QuestionType;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Editor behaviour, read from `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Scopes clipboard keys to one form instance
    #[serde(default = "default_clipboard_prefix")]
    pub clipboard_prefix: String,
    #[serde(default = "default_clipboard_ttl_secs")]
    pub clipboard_ttl_secs: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_jitter_ms: u64,
    /// Steps shown before the step bar collapses into an ellipsis
    #[serde(default = "default_step_limit")]
    pub step_limit: usize,
    /// Free-text stage labels without the association group lock
    #[serde(default)]
    pub expert: bool,
    #[serde(default = "default_available_types")]
    pub available_types: Vec<QuestionType>,
}

fn default_clipboard_prefix() -> String {
    "form".to_string()
}

fn default_clipboard_ttl_secs() -> u64 {
    600
}

fn default_settle_ms() -> u64 {
    777
}

fn default_step_limit() -> usize {
    3
}

fn default_available_types() -> Vec<QuestionType> {
    QuestionType::ALL.to_vec()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            clipboard_prefix: default_clipboard_prefix(),
            clipboard_ttl_secs: default_clipboard_ttl_secs(),
            settle_delay_ms: default_settle_ms(),
            settle_jitter_ms: default_settle_ms(),
            step_limit: default_step_limit(),
            expert: false,
            available_types: default_available_types(),
        }
    }
}

impl EditorConfig {
    /// Defaults with free-text stages
    pub fn expert() -> Self {
        Self {
            expert: true,
            ..Self::default()
        }
    }

    /// No settle delay, so save status flips back immediately
    pub fn testing() -> Self {
        Self {
            settle_delay_ms: 0,
            settle_jitter_ms: 0,
            ..Self::default()
        }
    }

    pub fn clipboard_ttl(&self) -> Duration {
        Duration::from_secs(self.clipboard_ttl_secs)
    }

    /// Settle delay including a random jitter
    pub fn settle_delay(&self) -> Duration {
        let jitter = if self.settle_jitter_ms == 0 {
            0
        } else {
            rand::random::<u64>() % self.settle_jitter_ms
        };
        Duration::from_millis(self.settle_delay_ms + jitter)
    }

    pub fn is_available(&self, ty: QuestionType) -> bool {
        self.available_types.contains(&ty)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("form-schema");
        Ok(config_dir.join("config.toml"))
    }

    /// Load from the user config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if !config_path.exists() {
            info!("Config file doesn't exist, using default editor config");
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading editor config from: {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: EditorConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        debug!(
            "Loaded editor config with {} question types",
            config.available_types.len()
        );
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        let content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        info!("Editor config saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.clipboard_prefix, "form");
        assert_eq!(config.clipboard_ttl(), Duration::from_secs(600));
        assert_eq!(config.step_limit, 3);
        assert!(!config.expert);
        assert_eq!(config.available_types.len(), QuestionType::ALL.len());
    }

    #[test]
    fn test_presets() {
        assert!(EditorConfig::expert().expert);
        assert_eq!(EditorConfig::testing().settle_delay(), Duration::ZERO);
    }

    #[test]
    fn test_settle_delay_stays_within_jitter() {
        let config = EditorConfig::default();
        for _ in 0..20 {
            let delay = config.settle_delay();
            assert!(delay >= Duration::from_millis(777));
            assert!(delay < Duration::from_millis(777 * 2));
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EditorConfig = toml::from_str(
            r#"
            clipboard_prefix = "survey-12"
            available_types = ["short-answer", "cascader"]
            "#,
        )
        .unwrap();

        assert_eq!(config.clipboard_prefix, "survey-12");
        assert_eq!(config.clipboard_ttl_secs, 600);
        assert!(config.is_available(QuestionType::Cascader));
        assert!(!config.is_available(QuestionType::Switch));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("form-schema-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut config = EditorConfig::expert();
        config.step_limit = 5;
        config.save_to(&path).unwrap();

        let loaded = EditorConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error_for_explicit_path() {
        let path = std::env::temp_dir().join("form-schema-does-not-exist.toml");
        assert!(EditorConfig::load_from(&path).is_err());
    }
}
