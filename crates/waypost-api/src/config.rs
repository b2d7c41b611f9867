use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "WAYPOST_BIND_ADDR", "127.0.0.1:3001");
        if bind_addr.is_empty() {
            return Err(ConfigError::Invalid(
                "WAYPOST_BIND_ADDR must not be empty".to_string(),
            ));
        }

        let data_dir = PathBuf::from(value_or_default(&lookup, "WAYPOST_DATA_DIR", "./data"));

        Ok(Self {
            bind_addr,
            data_dir,
        })
    }
}

fn value_or_default(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3001");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn env_values_override_defaults() {
        let config = AppConfig::from_lookup(|name| match name {
            "WAYPOST_BIND_ADDR" => Some("0.0.0.0:9000".to_string()),
            "WAYPOST_DATA_DIR" => Some("/var/lib/waypost".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/waypost"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(|name| match name {
            "WAYPOST_BIND_ADDR" => Some("   ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3001");
    }
}
