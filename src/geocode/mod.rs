use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::location::Coordinates;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Shown in place of a city when reverse geocoding fails. Place-name failures
/// never end a run; the forecast and recommendation still render.
pub const FALLBACK_CITY: &str = "your location";

/// Resolve coordinates to a display city name. Infallible at this seam:
/// implementations absorb their own failures and fall back to
/// [`FALLBACK_CITY`].
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    async fn resolve_city(&self, coords: Coordinates) -> String;
}

/// Nominatim (OpenStreetMap) reverse geocoding client
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
}

impl NominatimClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("scentcast/0.1.0")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: NOMINATIM_URL.to_string(),
        })
    }

    async fn lookup(&self, coords: Coordinates) -> Option<String> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, coords.latitude, coords.longitude
        );

        debug!("Reverse geocode request: {}", url);
        let resp = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !resp.status().is_success() {
            debug!("Reverse geocode returned status {}", resp.status());
            return None;
        }

        let body: ReverseResponse = match resp.json().await {
            Ok(b) => b,
            Err(e) => {
                debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        pick_city(body)
    }
}

#[async_trait]
impl PlaceResolver for NominatimClient {
    async fn resolve_city(&self, coords: Coordinates) -> String {
        match self.lookup(coords).await {
            Some(city) => city,
            None => {
                debug!("No city in reverse geocode result, using fallback");
                FALLBACK_CITY.to_string()
            }
        }
    }
}

/// City beats town when the address carries both
fn pick_city(body: ReverseResponse) -> Option<String> {
    let addr = body.address?;
    addr.city.or(addr.town)
}
