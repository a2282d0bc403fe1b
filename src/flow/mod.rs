use tracing::debug;

use crate::advisor::{Advisor, FragranceRecommendation};
use crate::error::FlowError;
use crate::geocode::PlaceResolver;
use crate::location::Locator;
use crate::ui::Ui;
use crate::weather::{WeatherReading, WeatherSource};

/// Where a recommendation run currently is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowState {
    Idle,
    LocatingUser,
    FetchingWeatherAndCity,
    GeneratingFragrance,
    Done,
    Error,
}

impl FlowState {
    /// A run is in progress; new triggers are ignored until it settles
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            FlowState::LocatingUser | FlowState::FetchingWeatherAndCity | FlowState::GeneratingFragrance
        )
    }

    /// Progress message published before the state's async work starts
    fn status_text(&self) -> Option<&'static str> {
        match self {
            FlowState::LocatingUser => Some("Finding your location..."),
            FlowState::FetchingWeatherAndCity => Some("Checking the weather near you..."),
            FlowState::GeneratingFragrance => Some("Matching a fragrance to the moment..."),
            _ => None,
        }
    }
}

/// Assembled only once location, weather and the recommendation have all
/// succeeded; partial results never reach the presenter.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowResult {
    pub city: String,
    pub weather: WeatherReading,
    pub fragrance: FragranceRecommendation,
}

impl FlowResult {
    pub fn location_line(&self) -> String {
        format!("Forecast for {}", self.city)
    }

    pub fn weather_line(&self) -> String {
        self.weather.summary()
    }

    pub fn scent_line(&self) -> &str {
        &self.fragrance.scents
    }

    pub fn reason_line(&self) -> String {
        format!("Mood: {}. {}", self.fragrance.mood, self.fragrance.reason)
    }
}

/// Drives one recommendation run: locate, fetch weather and city together,
/// ask the advisor, render. Any failure short-circuits to the error panel,
/// except place-name resolution which its resolver absorbs.
pub struct FlowController {
    locator: Box<dyn Locator>,
    weather: Box<dyn WeatherSource>,
    places: Box<dyn PlaceResolver>,
    advisor: Box<dyn Advisor>,
    ui: Box<dyn Ui>,
    state: FlowState,
}

impl FlowController {
    pub fn new(
        locator: Box<dyn Locator>,
        weather: Box<dyn WeatherSource>,
        places: Box<dyn PlaceResolver>,
        advisor: Box<dyn Advisor>,
        ui: Box<dyn Ui>,
    ) -> Self {
        Self {
            locator,
            weather,
            places,
            advisor,
            ui,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Run one flow from the top. A trigger while a run is active is
    /// ignored; a finished controller (Done or Error) starts over.
    pub async fn run(&mut self) {
        if self.state.is_active() {
            debug!("Trigger ignored, a run is already active");
            return;
        }

        match self.run_flow().await {
            Ok(result) => {
                self.state = FlowState::Done;
                self.ui.show_result(&result);
            }
            Err(e) => {
                self.state = FlowState::Error;
                self.ui.show_error(&e.to_string());
            }
        }
    }

    async fn run_flow(&mut self) -> Result<FlowResult, FlowError> {
        self.enter(FlowState::LocatingUser);
        let coords = self.locator.current_position().await?;
        debug!("Position: ({:.4}, {:.4})", coords.latitude, coords.longitude);

        self.enter(FlowState::FetchingWeatherAndCity);
        let (weather, city) = tokio::join!(
            self.weather.current_weather(coords),
            self.places.resolve_city(coords),
        );
        let weather = weather?;

        self.enter(FlowState::GeneratingFragrance);
        let fragrance = self.advisor.recommend(&weather).await?;

        Ok(FlowResult {
            city,
            weather,
            fragrance,
        })
    }

    fn enter(&mut self, state: FlowState) {
        if let Some(text) = state.status_text() {
            self.ui.show_status(text);
        }
        self.state = state;
    }
}
