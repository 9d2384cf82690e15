//! OpenWeatherMap current-weather client

use std::time::Duration;

use mausam_core::{NewReading, ProviderError, ProviderResult, WeatherSource};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeatherMap client configuration
#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    pub api_key: String,

    /// API root; `/weather` is appended
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenWeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl OpenWeatherSource {
    pub fn new(config: OpenWeatherConfig) -> ProviderResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ProviderError::Request(format!("invalid base url: {e}")))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/weather", base.as_str().trim_end_matches('/')),
            api_key: config.api_key,
        })
    }

    async fn get_body(&self, city: &str, country_code: &str) -> ProviderResult<String> {
        let location = format!("{city},{country_code}");
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", location.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Map a current-weather payload into a reading for `city`
pub fn parse_current(city: &str, body: &str) -> ProviderResult<NewReading> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or(ProviderError::MissingField("weather[0].main"))?;

    Ok(NewReading {
        city_name: city.to_string(),
        main: condition.main,
        temp: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        humidity: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        dt: parsed.dt,
    })
}

#[async_trait::async_trait]
impl WeatherSource for OpenWeatherSource {
    fn name(&self) -> &str {
        "openweather"
    }

    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str, country_code: &str) -> ProviderResult<NewReading> {
        let body = self.get_body(city, country_code).await?;
        let reading = parse_current(city, &body)?;
        debug!(temp = reading.temp, main = %reading.main, dt = reading.dt, "Mapped current weather");
        Ok(reading)
    }

    #[instrument(skip(self))]
    async fn fetch_raw(&self, city: &str, country_code: &str) -> ProviderResult<serde_json::Value> {
        let body = self.get_body(city, country_code).await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
