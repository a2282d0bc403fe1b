mod advisor;
mod config;
mod error;
mod flow;
mod geocode;
mod location;
mod ui;
mod weather;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use advisor::GeminiAdvisor;
use config::AppConfig;
use flow::FlowController;
use geocode::NominatimClient;
use ui::ConsoleUi;
use weather::open_meteo::OpenMeteoClient;

#[derive(Parser)]
#[command(name = "scentcast", about = "Fragrance recommendations matched to your local weather")]
struct Cli {
    /// Run a single recommendation and exit
    #[arg(long)]
    once: bool,
    /// Fixed latitude, instead of IP geolocation
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    latitude: Option<f64>,
    /// Fixed longitude, instead of IP geolocation
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    longitude: Option<f64>,
    /// Path to the config file (default: scentcast.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scentcast=info".into()),
        )
        .init();

    // Load .env if present (override system env vars)
    dotenvy::dotenv_override().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let (Some(latitude), Some(longitude)) = (cli.latitude, cli.longitude) {
        config.location.latitude = Some(latitude);
        config.location.longitude = Some(longitude);
    }

    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .context("GEMINI_API_KEY is not set; add it to .env or the environment")?;

    let locator = location::provider(&config.location)?;
    let mut flow = FlowController::new(
        locator,
        Box::new(OpenMeteoClient::new()?),
        Box::new(NominatimClient::new()?),
        Box::new(GeminiAdvisor::new(api_key, config.advisor.model.clone())?),
        Box::new(ConsoleUi),
    );

    if cli.once {
        flow.run().await;
        return Ok(());
    }

    println!("💐 scentcast — fragrance advice for your local weather");
    info!("Advisor model: {}", config.advisor.model);

    // The prompt is the trigger control: it is only offered again once the
    // current run has settled, so runs never overlap.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("\nPress Enter for a recommendation, or type q to quit.");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "q" | "quit" | "exit") {
            break;
        }
        flow.run().await;
    }

    Ok(())
}
