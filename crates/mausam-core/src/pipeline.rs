use crate::error::{ProviderResult, StoreResult};
use crate::types::{AlertReading, AlertThreshold, DailySummary, NewReading, Reading, Timestamp};

/// Source of current weather for a city
#[async_trait::async_trait]
pub trait WeatherSource: Send + Sync {
    /// Source name/identifier
    fn name(&self) -> &str;

    /// Fetch and map the current weather for `city`
    async fn fetch_current(&self, city: &str, country_code: &str) -> ProviderResult<NewReading>;

    /// Fetch the provider's raw current-weather payload
    async fn fetch_raw(&self, city: &str, country_code: &str) -> ProviderResult<serde_json::Value>;
}

/// Persistence for weather readings
#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    async fn insert(&self, reading: &NewReading) -> StoreResult<Reading>;

    /// Daily rollups ordered by (year, month, day, city)
    async fn aggregate_by_day(&self) -> StoreResult<Vec<DailySummary>>;

    /// Readings observed at or after `since` that trip `threshold`, newest first
    async fn find_alert_candidates(
        &self,
        since: Timestamp,
        threshold: &AlertThreshold,
    ) -> StoreResult<Vec<AlertReading>>;

    async fn count(&self) -> StoreResult<u64>;
}

/// Append-only history of alert thresholds
#[async_trait::async_trait]
pub trait ThresholdStore: Send + Sync {
    async fn create(&self, temperature: f64, weather_condition: &str)
        -> StoreResult<AlertThreshold>;

    /// Most recently created threshold, if any
    async fn current(&self) -> StoreResult<Option<AlertThreshold>>;

    /// All thresholds, oldest first
    async fn history(&self) -> StoreResult<Vec<AlertThreshold>>;

    /// Current threshold, or the built-in default
    async fn get_current(&self) -> StoreResult<AlertThreshold> {
        Ok(self.current().await?.unwrap_or_default())
    }
}
