//! One pass over the city table

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mausam_core::{City, ProviderError, Reading, ReadingStore, StoreError, WeatherSource, CITIES};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::DEFAULT_FETCH_TIMEOUT;

/// Why a single city failed within a cycle
#[derive(Debug, Error)]
pub enum CityError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub failed: usize,

    /// Set when the cycle did not run because another was in flight
    pub skipped: bool,
}

/// Fetches every configured city sequentially and stores the readings
pub struct Poller {
    source: Arc<dyn WeatherSource>,
    store: Arc<dyn ReadingStore>,
    fetch_timeout: Duration,
    running: AtomicBool,
}

/// Clears the in-flight flag even if the cycle future is dropped
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Poller {
    pub fn new(source: Arc<dyn WeatherSource>, store: Arc<dyn ReadingStore>) -> Self {
        Self {
            source,
            store,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            running: AtomicBool::new(false),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one cycle. Returns a skipped report if a cycle is already running.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn run_cycle(&self) -> CycleReport {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Previous poll cycle still running, skipping");
            return CycleReport {
                skipped: true,
                ..Default::default()
            };
        }
        let _guard = RunningGuard(&self.running);

        let mut report = CycleReport::default();
        for city in CITIES.iter() {
            match self.poll_city(city).await {
                Ok(reading) => {
                    report.fetched += 1;
                    info!(
                        city = city.name,
                        temp = reading.data.temp,
                        main = %reading.data.main,
                        "Weather data fetched"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    // Continue with the remaining cities
                    error!(city = city.name, error = %e, "Error fetching weather data");
                }
            }
        }

        info!(
            fetched = report.fetched,
            failed = report.failed,
            "Poll cycle complete"
        );
        report
    }

    async fn poll_city(&self, city: &City) -> Result<Reading, CityError> {
        let fetch = self.source.fetch_current(city.name, city.country_code);
        let reading = tokio::time::timeout(self.fetch_timeout, fetch)
            .await
            .map_err(|_| ProviderError::Timeout(self.fetch_timeout.as_secs()))??;

        Ok(self.store.insert(&reading).await?)
    }
}
