//! Simulated weather source for offline runs

use chrono::Utc;
use mausam_core::{NewReading, ProviderResult, WeatherSource};
use serde_json::json;

const CONDITIONS: [&str; 5] = ["Clear", "Clouds", "Haze", "Rain", "Mist"];

/// Source that generates synthetic readings from the clock
#[derive(Debug, Clone)]
pub struct SimulatorSource {
    base_temp: f64,
}

impl SimulatorSource {
    pub fn new() -> Self {
        Self {
            base_temp: 30.0, // 30°C base temperature
        }
    }

    fn generate(&self, city: &str, now: i64) -> NewReading {
        // Pseudo-random variation, stable per city and minute
        let salt: i64 = city.bytes().map(i64::from).sum();
        let variation = (((now / 60 + salt) % 100) as f64 / 10.0) - 5.0;
        let condition = CONDITIONS[((now / 300 + salt) % CONDITIONS.len() as i64) as usize];

        NewReading {
            city_name: city.to_string(),
            main: condition.to_string(),
            temp: self.base_temp + variation,
            feels_like: self.base_temp + variation * 1.2,
            humidity: 60 + (variation * 2.0) as i64,
            wind_speed: 3.0 + variation.abs() / 2.0,
            dt: now,
        }
    }
}

impl Default for SimulatorSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl WeatherSource for SimulatorSource {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn fetch_current(&self, city: &str, _country_code: &str) -> ProviderResult<NewReading> {
        Ok(self.generate(city, Utc::now().timestamp()))
    }

    async fn fetch_raw(&self, city: &str, country_code: &str) -> ProviderResult<serde_json::Value> {
        let r = self.generate(city, Utc::now().timestamp());
        Ok(json!({
            "name": r.city_name,
            "sys": {"country": country_code},
            "weather": [{"main": r.main}],
            "main": {"temp": r.temp, "feels_like": r.feels_like, "humidity": r.humidity},
            "wind": {"speed": r.wind_speed},
            "dt": r.dt,
        }))
    }
}
