//! Core library for the `skycheck` weather lookup.
//!
//! This crate defines:
//! - The query/reading domain model and the fetch error taxonomy
//! - The WeatherAPI.com client behind the [`client::WeatherFetcher`] seam
//! - The presenter state machine consumed by display layers
//! - Configuration & credential handling
//!
//! It is used by `skycheck-cli`, but can also be reused by other binaries or
//! services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod presenter;

pub use client::{DEFAULT_BASE_URL, WeatherApiClient, WeatherFetcher};
pub use config::Config;
pub use error::FetchError;
pub use model::{WeatherQuery, WeatherReading};
pub use presenter::{FetchOutcome, WeatherPresenter};
