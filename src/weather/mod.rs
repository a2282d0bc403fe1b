pub mod open_meteo;
pub mod wmo;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::FlowError;
use crate::location::Coordinates;

/// Current conditions, normalized for display
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    /// Temperature rounded to the nearest whole degree
    pub temperature_c: i32,
    pub description: String,
    /// Observation time reported by the provider, when present
    pub observed_at: Option<NaiveDateTime>,
}

impl WeatherReading {
    /// Build a reading from the provider's raw temperature and WMO code
    pub fn from_current(temperature: f64, code: i32, observed_at: Option<NaiveDateTime>) -> Self {
        Self {
            temperature_c: temperature.round() as i32,
            description: wmo::describe(code).to_string(),
            observed_at,
        }
    }

    /// One-line summary, e.g. "Slight rain, 12°C"
    pub fn summary(&self) -> String {
        format!("{}, {}°C", self.description, self.temperature_c)
    }
}

/// Fetch current conditions for a position. A failure here ends the run.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_weather(&self, coords: Coordinates) -> Result<WeatherReading, FlowError>;
}
