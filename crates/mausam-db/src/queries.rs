//! Query operations for the readings and alert_thresholds tables

use crate::schema::{AlertRow, ReadingRow, ThresholdRow};
use crate::{DbClient, DbError, DbResult};
use chrono::Utc;
use mausam_core::NewReading;
use sqlx::Row;
use tracing::{debug, instrument};

impl DbClient {
    /// Insert a reading and return the stored row
    #[instrument(skip(self, reading), fields(city = %reading.city_name))]
    pub async fn insert_reading(&self, reading: &NewReading) -> DbResult<ReadingRow> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO readings (
                city_name, main, temp, feels_like, humidity, wind_speed, dt, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reading.city_name)
        .bind(&reading.main)
        .bind(reading.temp)
        .bind(reading.feels_like)
        .bind(reading.humidity)
        .bind(reading.wind_speed)
        .bind(reading.dt)
        .bind(created_at)
        .execute(self.pool())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| DbError::ConfigError("reading id out of range".to_string()))?;
        debug!("Inserted reading {} for dt {}", id, reading.dt);

        Ok(ReadingRow {
            id,
            city_name: reading.city_name.clone(),
            main: reading.main.clone(),
            temp: reading.temp,
            feels_like: reading.feels_like,
            humidity: reading.humidity,
            wind_speed: reading.wind_speed,
            dt: reading.dt,
            created_at,
        })
    }

    /// All readings in insertion order
    #[instrument(skip(self))]
    pub async fn get_all_readings(&self) -> DbResult<Vec<ReadingRow>> {
        let rows = sqlx::query_as::<_, ReadingRow>(
            r#"
            SELECT id, city_name, main, temp, feels_like, humidity, wind_speed, dt, created_at
            FROM readings
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        debug!("Retrieved {} readings", rows.len());
        Ok(rows)
    }

    /// Readings since `since` that exceed `temperature` or match `condition` exactly
    #[instrument(skip(self))]
    pub async fn get_alert_rows(
        &self,
        since: i64,
        temperature: f64,
        condition: &str,
    ) -> DbResult<Vec<AlertRow>> {
        let rows = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT city_name, temp, main, dt
            FROM readings
            WHERE dt >= ? AND (temp > ? OR main = ?)
            ORDER BY dt DESC, id ASC
            "#,
        )
        .bind(since)
        .bind(temperature)
        .bind(condition)
        .fetch_all(self.pool())
        .await?;

        debug!("Found {} alert rows since {}", rows.len(), since);
        Ok(rows)
    }

    /// Get count of readings
    #[instrument(skip(self))]
    pub async fn count_readings(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM readings")
            .fetch_one(self.pool())
            .await?;

        Ok(row.get("count"))
    }

    /// Append a threshold record
    #[instrument(skip(self))]
    pub async fn insert_threshold(
        &self,
        temperature: f64,
        weather_condition: &str,
    ) -> DbResult<ThresholdRow> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO alert_thresholds (temperature, weather_condition, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(temperature)
        .bind(weather_condition)
        .bind(created_at)
        .execute(self.pool())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| DbError::ConfigError("threshold id out of range".to_string()))?;
        debug!("Inserted threshold {}", id);

        Ok(ThresholdRow {
            id,
            temperature,
            weather_condition: weather_condition.to_string(),
            created_at,
        })
    }

    /// Most recently created threshold
    #[instrument(skip(self))]
    pub async fn get_latest_threshold(&self) -> DbResult<Option<ThresholdRow>> {
        let row = sqlx::query_as::<_, ThresholdRow>(
            r#"
            SELECT id, temperature, weather_condition, created_at
            FROM alert_thresholds
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// Every threshold, oldest first
    #[instrument(skip(self))]
    pub async fn get_threshold_history(&self) -> DbResult<Vec<ThresholdRow>> {
        let rows = sqlx::query_as::<_, ThresholdRow>(
            r#"
            SELECT id, temperature, weather_condition, created_at
            FROM alert_thresholds
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
