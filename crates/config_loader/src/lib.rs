//! # Config Loader
//!
//! Reads a watch configuration file and checks it before any network or
//! storage work happens.
//!
//! - `.toml` and `.json` files, chosen by extension
//! - Every loaded config passes the same rules as one assembled from CLI flags
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("watch.toml")).unwrap();
//! println!("Organization: {}", config.organization);
//! ```

mod parser;
mod validator;

pub use contracts::WatchConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Entry point for loading and validating `WatchConfig`
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read, parse and validate a config file
    ///
    /// # Errors
    /// Unknown extension, unreadable file, parse failure or a failed rule
    pub fn load_from_path(path: &Path) -> Result<WatchConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| ContractError::storage("read", path, e.to_string()))?;
        Self::load_from_str(&content, format)
    }

    /// Parse and validate config text
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<WatchConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Validate a config assembled in code (e.g. from CLI flags)
    pub fn validate(config: &WatchConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Pretty JSON form, as written by `validate --json` style tooling
    pub fn to_json(config: &WatchConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!(
                "{}: expected a .toml or .json file",
                path.display()
            ))
        })
    }
}
