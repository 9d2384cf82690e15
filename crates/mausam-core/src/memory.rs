//! In-process store used for development runs and tests

use crate::error::StoreResult;
use crate::pipeline::{ReadingStore, ThresholdStore};
use crate::rollups::summarize_by_day;
use crate::types::{AlertReading, AlertThreshold, DailySummary, NewReading, Reading, Timestamp};
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    readings: Vec<Reading>,
    thresholds: Vec<AlertThreshold>,
}

/// Reading and threshold store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all readings in insertion order
    pub async fn readings(&self) -> Vec<Reading> {
        self.tables.read().await.readings.clone()
    }
}

#[async_trait::async_trait]
impl ReadingStore for MemoryStore {
    async fn insert(&self, reading: &NewReading) -> StoreResult<Reading> {
        let mut tables = self.tables.write().await;
        let stored = Reading {
            id: tables.readings.len() as i64 + 1,
            data: reading.clone(),
            created_at: Utc::now(),
        };
        tables.readings.push(stored.clone());
        Ok(stored)
    }

    async fn aggregate_by_day(&self) -> StoreResult<Vec<DailySummary>> {
        let tables = self.tables.read().await;
        Ok(summarize_by_day(&tables.readings))
    }

    async fn find_alert_candidates(
        &self,
        since: Timestamp,
        threshold: &AlertThreshold,
    ) -> StoreResult<Vec<AlertReading>> {
        let tables = self.tables.read().await;
        let mut alerts: Vec<AlertReading> = tables
            .readings
            .iter()
            .filter(|r| r.data.dt >= since)
            .filter(|r| threshold.is_triggered_by(r.data.temp, &r.data.main))
            .map(Reading::to_alert)
            .collect();
        alerts.sort_by(|a, b| b.dt.cmp(&a.dt));
        Ok(alerts)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.readings.len() as u64)
    }
}

#[async_trait::async_trait]
impl ThresholdStore for MemoryStore {
    async fn create(
        &self,
        temperature: f64,
        weather_condition: &str,
    ) -> StoreResult<AlertThreshold> {
        let mut tables = self.tables.write().await;
        let threshold = AlertThreshold {
            id: Some(tables.thresholds.len() as i64 + 1),
            temperature,
            weather_condition: weather_condition.to_string(),
            created_at: Some(Utc::now()),
        };
        tables.thresholds.push(threshold.clone());
        Ok(threshold)
    }

    async fn current(&self) -> StoreResult<Option<AlertThreshold>> {
        Ok(self.tables.read().await.thresholds.last().cloned())
    }

    async fn history(&self) -> StoreResult<Vec<AlertThreshold>> {
        Ok(self.tables.read().await.thresholds.clone())
    }
}
