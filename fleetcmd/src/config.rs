//! Process-wide configuration document.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default location of the configuration document, relative to the
/// working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Process-wide settings loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// DNS suffix appended to device identifiers that are not literal
    /// addresses.
    pub def_domain: String,
}

impl AppConfig {
    /// Load the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: AppConfig = serde_yaml::from_str("def_domain: .net.example.com").unwrap();
        assert_eq!(config.def_domain, ".net.example.com");
    }
}
