//! Fixed table of polled cities

use serde::Serialize;

/// A city the poller fetches on every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub country_code: &'static str,
}

impl City {
    pub const fn new(name: &'static str, country_code: &'static str) -> Self {
        Self { name, country_code }
    }
}

/// Country used for ad-hoc current-weather lookups
pub const DEFAULT_COUNTRY_CODE: &str = "IN";

/// Cities polled each cycle, in fetch order
pub const CITIES: [City; 6] = [
    City::new("Delhi", DEFAULT_COUNTRY_CODE),
    City::new("Mumbai", DEFAULT_COUNTRY_CODE),
    City::new("Chennai", DEFAULT_COUNTRY_CODE),
    City::new("Bangalore", DEFAULT_COUNTRY_CODE),
    City::new("Kolkata", DEFAULT_COUNTRY_CODE),
    City::new("Hyderabad", DEFAULT_COUNTRY_CODE),
];
