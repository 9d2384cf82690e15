//! Periodic fetch-and-store of city weather
//!
//! [`Poller`] runs one cycle over the city table; [`Scheduler`] drives it on
//! a fixed interval until shutdown is signalled.

pub mod poller;
pub mod scheduler;

pub use poller::*;
pub use scheduler::*;

use std::time::Duration;

/// Default poll interval (5 minutes)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Default upper bound on a single city fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
