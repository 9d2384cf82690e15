//! Alert evaluation against the live current threshold

use crate::error::StoreResult;
use crate::pipeline::{ReadingStore, ThresholdStore};
use crate::types::{AlertReading, Timestamp};

/// Active alerts for the last `window_secs` seconds before `now`.
///
/// The threshold is resolved at call time, so a threshold change applies to
/// all readings already stored.
pub async fn find_alert_candidates(
    readings: &dyn ReadingStore,
    thresholds: &dyn ThresholdStore,
    window_secs: i64,
    now: Timestamp,
) -> StoreResult<Vec<AlertReading>> {
    let threshold = thresholds.get_current().await?;
    readings
        .find_alert_candidates(now - window_secs, &threshold)
        .await
}
