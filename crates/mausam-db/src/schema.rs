//! Row types and table definitions

use chrono::{DateTime, Utc};
use mausam_core::{AlertReading, AlertThreshold, NewReading, Reading};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};

/// Table names
pub mod tables {
    pub const READINGS: &str = "readings";
    pub const ALERT_THRESHOLDS: &str = "alert_thresholds";
}

// utf8mb4_0900_bin is binary and NO PAD: condition equality is exact,
// including case and trailing spaces.
const CREATE_READINGS: &str = r#"
CREATE TABLE IF NOT EXISTS readings (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    city_name VARCHAR(128) CHARACTER SET utf8mb4 COLLATE utf8mb4_0900_bin NOT NULL,
    main TEXT CHARACTER SET utf8mb4 COLLATE utf8mb4_0900_bin NOT NULL,
    temp DOUBLE NOT NULL,
    feels_like DOUBLE NOT NULL,
    humidity BIGINT NOT NULL,
    wind_speed DOUBLE NOT NULL,
    dt BIGINT NOT NULL,
    created_at DATETIME(6) NOT NULL,
    INDEX idx_readings_dt (dt)
)
"#;

const CREATE_ALERT_THRESHOLDS: &str = r#"
CREATE TABLE IF NOT EXISTS alert_thresholds (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    temperature DOUBLE NOT NULL,
    weather_condition TEXT CHARACTER SET utf8mb4 COLLATE utf8mb4_0900_bin NOT NULL,
    created_at DATETIME(6) NOT NULL,
    INDEX idx_alert_thresholds_created (created_at)
)
"#;

/// Create tables that do not exist yet
pub async fn migrate(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_READINGS).execute(pool).await?;
    sqlx::query(CREATE_ALERT_THRESHOLDS).execute(pool).await?;
    Ok(())
}

/// `readings` table record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReadingRow {
    pub id: i64,
    pub city_name: String,
    pub main: String,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub wind_speed: f64,
    pub dt: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ReadingRow> for Reading {
    fn from(row: ReadingRow) -> Self {
        Reading {
            id: row.id,
            data: NewReading {
                city_name: row.city_name,
                main: row.main,
                temp: row.temp,
                feels_like: row.feels_like,
                humidity: row.humidity,
                wind_speed: row.wind_speed,
                dt: row.dt,
            },
            created_at: row.created_at,
        }
    }
}

/// Alert projection of a `readings` record
#[derive(Debug, Clone, FromRow)]
pub struct AlertRow {
    pub city_name: String,
    pub temp: f64,
    pub main: String,
    pub dt: i64,
}

impl From<AlertRow> for AlertReading {
    fn from(row: AlertRow) -> Self {
        AlertReading {
            city_name: row.city_name,
            temp: row.temp,
            main: row.main,
            dt: row.dt,
        }
    }
}

/// `alert_thresholds` table record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ThresholdRow {
    pub id: i64,
    pub temperature: f64,
    pub weather_condition: String,
    pub created_at: DateTime<Utc>,
}

impl From<ThresholdRow> for AlertThreshold {
    fn from(row: ThresholdRow) -> Self {
        AlertThreshold {
            id: Some(row.id),
            temperature: row.temperature,
            weather_condition: row.weather_condition,
            created_at: Some(row.created_at),
        }
    }
}
