//! Weather source adapters
//!
//! [`OpenWeatherSource`] talks to the OpenWeatherMap current-weather API.
//! [`SimulatorSource`] produces synthetic readings for offline runs.

pub mod openweather;
pub mod simulator;

pub use openweather::*;
pub use simulator::*;

use std::sync::Arc;

use mausam_core::WeatherSource;

/// Which source implementation to build
#[derive(Debug, Clone)]
pub enum SourceKind {
    OpenWeather(OpenWeatherConfig),
    Simulator,
}

/// Build a shareable source handle
pub fn build_source(kind: SourceKind) -> mausam_core::ProviderResult<Arc<dyn WeatherSource>> {
    let source: Arc<dyn WeatherSource> = match kind {
        SourceKind::OpenWeather(config) => Arc::new(OpenWeatherSource::new(config)?),
        SourceKind::Simulator => Arc::new(SimulatorSource::new()),
    };
    tracing::info!(source = source.name(), "Weather source ready");
    Ok(source)
}
