use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Coordinates, Locator};
use crate::error::FlowError;

const IPAPI_URL: &str = "https://ipapi.co";

/// IP-based geolocation via ipapi.co. No API key; accuracy is city-level,
/// which is all the forecast needs.
pub struct IpLookupClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl IpLookupClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("scentcast/0.1.0")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: IPAPI_URL.to_string(),
        })
    }
}

#[async_trait]
impl Locator for IpLookupClient {
    async fn current_position(&self) -> Result<Coordinates, FlowError> {
        let url = format!("{}/json/", self.base_url);

        debug!("IP geolocation request: {}", url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FlowError::GeolocationFailed(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FlowError::GeolocationDenied(format!(
                "geolocation service refused the request (status {})",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(FlowError::GeolocationFailed(format!(
                "geolocation service returned status {}",
                status.as_u16()
            )));
        }

        let data: IpLookupResponse = resp
            .json()
            .await
            .map_err(|e| FlowError::GeolocationFailed(e.to_string()))?;

        match (data.latitude, data.longitude) {
            (Some(latitude), Some(longitude)) => {
                debug!("IP geolocation resolved to ({:.4}, {:.4})", latitude, longitude);
                Ok(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(FlowError::GeolocationFailed(
                "no coordinates in geolocation response".to_string(),
            )),
        }
    }
}
