use std::sync::Arc;

use clap::{Parser, Subcommand};
use skycheck_core::{Config, FetchOutcome, WeatherApiClient, WeatherPresenter, WeatherQuery, WeatherReading};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycheck", version, about = "Current weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key used for lookups.
    Configure,

    /// Show current weather for a city name.
    Show {
        /// City name, e.g. "Beijing" or "New York".
        city: String,
    },

    /// Show current weather for a coordinate pair.
    Locate {
        /// Latitude in decimal degrees.
        lat: f64,

        /// Longitude in decimal degrees.
        lon: f64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => lookup(WeatherQuery::City(city)).await,
            Command::Locate { lat, lon } => lookup(WeatherQuery::Coordinates { lat, lon }).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("WeatherAPI.com key:")
        .without_confirmation()
        .prompt()?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn lookup(query: WeatherQuery) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = WeatherApiClient::from_config(&config)?;
    let presenter = WeatherPresenter::new(Arc::new(client));

    match presenter.request_fetch(query).await {
        FetchOutcome::Success(reading) => {
            println!("{}", render_reading(&reading));
            Ok(())
        }
        FetchOutcome::Failure(err) => Err(anyhow::anyhow!("{err}")),
        other => Err(anyhow::anyhow!("fetch ended in unexpected state: {other:?}")),
    }
}

fn render_reading(reading: &WeatherReading) -> String {
    let mut place = reading.location.clone();
    if !reading.region.is_empty() && reading.region != reading.location {
        place.push_str(", ");
        place.push_str(&reading.region);
    }
    place.push_str(", ");
    place.push_str(&reading.country);

    let localtime = reading
        .localtime_parsed()
        .map(|dt| dt.format("%H:%M on %A, %d %b %Y").to_string())
        .unwrap_or_else(|| reading.localtime.clone());

    format!(
        "{place} ({lat:.2}, {lon:.2})\n\
         Local time: {localtime}\n\
         {condition}, {temp_c:.1} °C / {temp_f:.1} °F \
         (feels like {feels_c:.1} °C / {feels_f:.1} °F)\n\
         Wind {wind_kph:.1} kph ({wind_mph:.1} mph), humidity {humidity}%, UV {uv:.1}",
        lat = reading.latitude,
        lon = reading.longitude,
        condition = reading.condition,
        temp_c = reading.temp_c,
        temp_f = reading.temp_f,
        feels_c = reading.feelslike_c,
        feels_f = reading.feelslike_f,
        wind_kph = reading.wind_kph,
        wind_mph = reading.wind_mph,
        humidity = reading.humidity,
        uv = reading.uv,
    )
}
