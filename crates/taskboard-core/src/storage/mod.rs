pub mod config;

pub use config::ConfigStorage;

use std::path::PathBuf;

/// `<config_dir>/taskboard`, if the platform has a config directory
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskboard"))
}

pub fn init_config_dir() -> crate::Result<PathBuf> {
    let config_dir = get_config_dir().ok_or_else(|| {
        crate::Error::Validation("Could not find config directory".to_string())
    })?;
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}
