use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use super::{WeatherReading, WeatherSource};
use crate::error::FlowError;
use crate::location::Coordinates;

const OPEN_METEO_API: &str = "https://api.open-meteo.com";

/// Open-Meteo current-conditions client
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
    time: Option<String>,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("scentcast/0.1.0")
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: OPEN_METEO_API.to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn current_weather(&self, coords: Coordinates) -> Result<WeatherReading, FlowError> {
        let url = format!(
            "{}/v1/forecast?latitude={:.4}&longitude={:.4}&current_weather=true",
            self.base_url, coords.latitude, coords.longitude
        );

        debug!("Open-Meteo request: {}", url);
        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(FlowError::WeatherFetch(format!(
                "service returned status {}",
                resp.status().as_u16()
            )));
        }

        let data: ForecastResponse = resp.json().await?;
        let current = data
            .current_weather
            .ok_or_else(|| FlowError::WeatherFetch("response had no current conditions".into()))?;

        let observed_at = current.time.as_deref().and_then(parse_observation_time);
        Ok(WeatherReading::from_current(
            current.temperature,
            current.weathercode,
            observed_at,
        ))
    }
}

/// Open-Meteo reports times with minute precision, e.g. "2026-08-07T15:00"
fn parse_observation_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok()
}
