use thiserror::Error;

/// Everything that can end a recommendation run. The `Display` text of each
/// variant is what the error panel shows the user.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Geolocation is not available on this system. Set coordinates in scentcast.toml or pass --latitude/--longitude.")]
    GeolocationUnsupported,

    #[error("Location access was denied: {0}")]
    GeolocationDenied(String),

    #[error("Could not determine your location: {0}")]
    GeolocationFailed(String),

    #[error("Could not fetch the weather: {0}")]
    WeatherFetch(String),

    #[error("Fragrance service error {status}: {detail}")]
    AiRequest { status: u16, detail: String },

    #[error("Fragrance service returned an invalid response structure")]
    AiResponseShape,

    #[error("Could not read the fragrance recommendation: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Something went wrong talking to the network: {0}")]
    Http(#[from] reqwest::Error),
}
