//! Core data types for city weather readings and alert configuration

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type (Unix epoch seconds)
pub type Timestamp = i64;

/// Default temperature ceiling (Celsius) when no threshold was ever configured
pub const DEFAULT_TEMPERATURE_THRESHOLD: f64 = 35.0;

/// Default alert look-back window in seconds
pub const DEFAULT_ALERT_WINDOW_SECS: i64 = 3600;

/// A reading as mapped from the provider, before the store assigns identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub city_name: String,

    /// Provider's condition category (e.g. "Clear", "Rain")
    pub main: String,

    /// Temperature in Celsius
    pub temp: f64,

    /// Feels-like temperature in Celsius
    pub feels_like: f64,

    /// Relative humidity in percent
    pub humidity: i64,

    /// Wind speed in m/s
    pub wind_speed: f64,

    /// Provider observation time, passed through verbatim
    pub dt: Timestamp,
}

/// A persisted weather reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Store-assigned id; strictly increasing in insertion order
    pub id: i64,

    #[serde(flatten)]
    pub data: NewReading,

    pub created_at: DateTime<Utc>,
}

impl Reading {
    pub fn city_name(&self) -> &str {
        &self.data.city_name
    }

    /// Projection used by the alerts endpoint
    pub fn to_alert(&self) -> AlertReading {
        AlertReading {
            city_name: self.data.city_name.clone(),
            temp: self.data.temp,
            main: self.data.main.clone(),
            dt: self.data.dt,
        }
    }
}

/// Subset of a reading returned as an active alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertReading {
    pub city_name: String,
    pub temp: f64,
    pub main: String,
    pub dt: Timestamp,
}

/// Alert trigger configuration. The most recently created one is current.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertThreshold {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Temperature ceiling in Celsius
    pub temperature: f64,

    /// Condition label that triggers an alert on exact match
    pub weather_condition: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for AlertThreshold {
    fn default() -> Self {
        Self {
            id: None,
            temperature: DEFAULT_TEMPERATURE_THRESHOLD,
            weather_condition: String::new(),
            created_at: None,
        }
    }
}

impl AlertThreshold {
    /// Whether a reading with this temperature and condition trips the threshold
    pub fn is_triggered_by(&self, temp: f64, main: &str) -> bool {
        temp > self.temperature || main == self.weather_condition
    }
}

/// Calendar day in UTC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDay {
    /// UTC day of a Unix timestamp; `None` if the timestamp is out of range
    pub fn from_timestamp(ts: Timestamp) -> Option<Self> {
        DateTime::from_timestamp(ts, 0).map(|t| Self {
            year: t.year(),
            month: t.month(),
            day: t.day(),
        })
    }
}

/// Aggregated statistics for one (city, UTC day) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub city_name: String,
    pub date: CalendarDay,
    pub average_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,

    /// Condition of the first-inserted reading of the day
    pub dominant_weather: String,
}
