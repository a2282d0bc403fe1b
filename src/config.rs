use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::advisor::AdvisorConfig;
use crate::location::LocationConfig;

const CONFIG_FILE: &str = "scentcast.toml";

/// Application configuration. Missing file or missing sections fall back to
/// the documented defaults; the Gemini key comes from the environment, never
/// from this file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub location: LocationConfig,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
        if path.exists() {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.advisor.model, "gemini-2.0-flash");
        assert!(config.location.enabled);
        assert!(config.location.latitude.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            [advisor]
            model = "gemini-2.5-pro"

            [location]
            enabled = false
            latitude = 51.5
            longitude = -0.12
            "#,
        )
        .unwrap();
        assert_eq!(config.advisor.model, "gemini-2.5-pro");
        assert!(!config.location.enabled);
        assert_eq!(config.location.latitude, Some(51.5));
        assert_eq!(config.location.longitude, Some(-0.12));
    }
}
