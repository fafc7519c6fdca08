use jsxed_store::DEFAULT_STORE_PATH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "jsxed.config.json";

/// Project configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// JSON file holding stored components
    #[serde(default = "default_store")]
    pub store: String,

    /// Quiet period before an edited component is saved
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_store() -> String {
    DEFAULT_STORE_PATH.to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Store path, `override_path` winning over the config file
    pub fn store_path(&self, cwd: &str, override_path: Option<&str>) -> PathBuf {
        PathBuf::from(cwd).join(override_path.unwrap_or(&self.store))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: default_store(),
            debounce_ms: default_debounce_ms(),
        }
    }
}
