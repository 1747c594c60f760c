//! Configuration storage operations

use crate::{models::ClientConfig, Result};
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.json";

pub struct ConfigStorage {
    config_dir: PathBuf,
}

impl ConfigStorage {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn load(&self) -> Result<ClientConfig> {
        let config_path = self.path();

        if !config_path.exists() {
            let config = ClientConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;

        if content.trim().is_empty() {
            let config = ClientConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let config: ClientConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(self.path(), content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("tracklink"));

        let config = storage.load().unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(storage.path().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().to_path_buf());

        let mut config = ClientConfig::new("https://jira.example.com");
        config.username = Some("ann".to_string());
        config.enable_request_trace = true;
        storage.save(&config).unwrap();

        assert_eq!(storage.load().unwrap(), config);
    }

    #[test]
    fn test_empty_file_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().to_path_buf());
        std::fs::write(storage.path(), "  \n").unwrap();

        let config = storage.load().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().to_path_buf());
        std::fs::write(storage.path(), "{not json").unwrap();

        assert!(matches!(storage.load(), Err(crate::Error::Json(_))));
    }
}
