//! Interval loop driving the poller

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::Poller;

/// Runs a poll cycle immediately and then every `interval`
pub struct Scheduler {
    poller: Arc<Poller>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(poller: Arc<Poller>, interval: Duration) -> Self {
        Self { poller, interval }
    }

    /// Run until `shutdown` turns true or its sender is dropped.
    ///
    /// Shutdown is only observed between cycles, so an in-flight cycle
    /// always completes.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> usize {
        info!("Scheduler started");
        info!("Poll interval: {}s", self.interval.as_secs());

        let mut ticker = tokio::time::interval(self.interval);
        // An overrunning cycle delays the next one instead of bunching ticks
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut cycles = 0;
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.poller.run_cycle().await;
                    cycles += 1;
                }
            }
        }

        info!(cycles, "Scheduler stopped");
        cycles
    }
}
