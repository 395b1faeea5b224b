//! Configuration for the garment agent

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::correction::DEFAULT_MAX_RETRIES;
use crate::orchestrator::DEFAULT_SESSION_ID;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whole-plan retries allowed beyond the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Conversation turns retained per session
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Session id used when the request names none
    #[serde(default = "default_session_id")]
    pub default_session_id: String,

    /// Whether to prime the planner with knowledge-base retrieval
    #[serde(default)]
    pub enable_retrieval: bool,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_history_capacity() -> usize {
    sessionstore::DEFAULT_HISTORY_CAPACITY
}

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            history_capacity: default_history_capacity(),
            default_session_id: default_session_id(),
            enable_retrieval: false,
            log_level: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        let default_path = PathBuf::from("garmentagent.yml");
        if default_path.exists() {
            let content = std::fs::read_to_string(&default_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.default_session_id, "default");
        assert!(!config.enable_retrieval);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("max_retries: 3\n").unwrap();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.history_capacity, 10);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yml");

        let mut config = Config::default();
        config.max_retries = 2;
        config.enable_retrieval = true;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.max_retries, 2);
        assert!(loaded.enable_retrieval);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let loaded = Config::load(None).unwrap();
        assert_eq!(loaded.max_retries, Config::default().max_retries);
    }
}
