//! Core store traits backed by MySQL

use crate::DbClient;
use mausam_core::{
    summarize_by_day, AlertReading, AlertThreshold, DailySummary, NewReading, Reading,
    ReadingStore, StoreResult, ThresholdStore, Timestamp,
};

#[async_trait::async_trait]
impl ReadingStore for DbClient {
    async fn insert(&self, reading: &NewReading) -> StoreResult<Reading> {
        Ok(self.insert_reading(reading).await?.into())
    }

    async fn aggregate_by_day(&self) -> StoreResult<Vec<DailySummary>> {
        let readings: Vec<Reading> = self
            .get_all_readings()
            .await?
            .into_iter()
            .map(Reading::from)
            .collect();
        Ok(summarize_by_day(&readings))
    }

    async fn find_alert_candidates(
        &self,
        since: Timestamp,
        threshold: &AlertThreshold,
    ) -> StoreResult<Vec<AlertReading>> {
        let rows = self
            .get_alert_rows(since, threshold.temperature, &threshold.weather_condition)
            .await?;
        Ok(rows.into_iter().map(AlertReading::from).collect())
    }

    async fn count(&self) -> StoreResult<u64> {
        let count = self.count_readings().await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait::async_trait]
impl ThresholdStore for DbClient {
    async fn create(
        &self,
        temperature: f64,
        weather_condition: &str,
    ) -> StoreResult<AlertThreshold> {
        Ok(self
            .insert_threshold(temperature, weather_condition)
            .await?
            .into())
    }

    async fn current(&self) -> StoreResult<Option<AlertThreshold>> {
        Ok(self.get_latest_threshold().await?.map(AlertThreshold::from))
    }

    async fn history(&self) -> StoreResult<Vec<AlertThreshold>> {
        Ok(self
            .get_threshold_history()
            .await?
            .into_iter()
            .map(AlertThreshold::from)
            .collect())
    }
}
