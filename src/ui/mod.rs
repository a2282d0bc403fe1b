use tracing::debug;

use crate::flow::FlowResult;

/// Presenter handle held by the flow controller, constructed once at
/// startup. Exactly one of {status, error, result} is emitted per
/// transition.
pub trait Ui: Send + Sync {
    fn show_status(&self, text: &str);
    fn show_error(&self, text: &str);
    fn show_result(&self, result: &FlowResult);
}

/// Terminal presenter
pub struct ConsoleUi;

impl Ui for ConsoleUi {
    fn show_status(&self, text: &str) {
        println!("⏳ {}", text);
    }

    fn show_error(&self, text: &str) {
        println!("\n⚠️  {}", text);
    }

    fn show_result(&self, result: &FlowResult) {
        debug!("Atmosphere: {}", result.fragrance.atmosphere);

        println!("\n🌍 {}", result.location_line());
        match result.weather.observed_at {
            Some(t) => println!("🌦️  {} (as of {})", result.weather_line(), t.format("%H:%M")),
            None => println!("🌦️  {}", result.weather_line()),
        }
        println!("💐 {}", result.scent_line());
        println!("   {}", result.reason_line());
    }
}
