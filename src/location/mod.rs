pub mod ip_lookup;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use ip_lookup::IpLookupClient;

/// A position on the globe, produced once per recommendation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Single-shot position lookup. One failure ends the run; there is no retry.
#[async_trait]
pub trait Locator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, FlowError>;
}

/// Location configuration loaded from scentcast.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Pin the position instead of using IP geolocation
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            latitude: None,
            longitude: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Pick the locator for this configuration: pinned coordinates win, then IP
/// geolocation, and with both unavailable every run reports the capability
/// as missing.
pub fn provider(config: &LocationConfig) -> Result<Box<dyn Locator>> {
    if let (Some(latitude), Some(longitude)) = (config.latitude, config.longitude) {
        return Ok(Box::new(FixedPosition(Coordinates {
            latitude,
            longitude,
        })));
    }
    if config.enabled {
        return Ok(Box::new(IpLookupClient::new()?));
    }
    Ok(Box::new(NoLocation))
}

/// Locator pinned to configured coordinates
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl Locator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, FlowError> {
        Ok(self.0)
    }
}

/// Stand-in when geolocation is disabled and no coordinates are pinned
pub struct NoLocation;

#[async_trait]
impl Locator for NoLocation {
    async fn current_position(&self) -> Result<Coordinates, FlowError> {
        Err(FlowError::GeolocationUnsupported)
    }
}
