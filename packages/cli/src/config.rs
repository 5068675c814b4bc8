use arnika_model::Template;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "arnika.config.json";

/// Arnika configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the stored project and history
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Quiet period before a change is written
    #[serde(default = "default_debounce_ms")]
    pub autosave_debounce_ms: u64,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Template used by `arnika init` without an argument
    #[serde(default = "default_template")]
    pub default_template: String,
}

fn default_store_dir() -> String {
    ".arnika".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_template() -> String {
    "pitch".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the store directory
    pub fn get_store_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_dir)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn template(&self) -> anyhow::Result<Template> {
        Ok(self.default_template.parse()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            autosave_debounce_ms: default_debounce_ms(),
            log_level: default_log_level(),
            default_template: default_template(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storeDir": "state",
            "autosaveDebounceMs": 250,
            "logLevel": "debug",
            "defaultTemplate": "works"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_dir, "state");
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.template().unwrap(), Template::Portfolio);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.store_dir, ".arnika");
        assert_eq!(config.autosave_debounce_ms, 500);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.template().unwrap(), Template::Pitch);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.get_store_dir(dir.path()), dir.path().join(".arnika"));
    }
}
