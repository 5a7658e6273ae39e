//! Configuration storage operations

use crate::{Result, models::Config};
use std::path::{Path, PathBuf};

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

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load the stored config, writing defaults when the file is missing or empty
    pub fn load(&self) -> Result<Config> {
        let config_path = self.path();

        if !config_path.exists() {
            return self.write_defaults();
        }

        let content = std::fs::read_to_string(config_path)?;
        if content.trim().is_empty() {
            return self.write_defaults();
        }

        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(self.path(), content)?;

        Ok(())
    }

    fn write_defaults(&self) -> Result<Config> {
        let config = Config::default();
        self.save(&config)?;
        tracing::info!(path = %self.path().display(), "wrote default config");
        Ok(config)
    }
}
