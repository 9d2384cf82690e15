//! Day-bucketed aggregation of readings

use crate::types::{CalendarDay, DailySummary, Reading};
use std::collections::BTreeMap;

/// Round to one decimal place, ties to even
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Accumulator for one (day, city) group
#[derive(Debug, Clone)]
pub struct DayAccumulator {
    count: usize,
    temp_sum: f64,
    temp_min: f64,
    temp_max: f64,
    humidity_sum: f64,
    wind_sum: f64,
    first_id: i64,
    first_main: String,
}

impl DayAccumulator {
    pub fn new(first: &Reading) -> Self {
        Self {
            count: 0,
            temp_sum: 0.0,
            temp_min: f64::INFINITY,
            temp_max: f64::NEG_INFINITY,
            humidity_sum: 0.0,
            wind_sum: 0.0,
            first_id: first.id,
            first_main: first.data.main.clone(),
        }
    }

    pub fn add(&mut self, reading: &Reading) {
        let data = &reading.data;
        self.count += 1;
        self.temp_sum += data.temp;
        self.temp_min = self.temp_min.min(data.temp);
        self.temp_max = self.temp_max.max(data.temp);
        self.humidity_sum += data.humidity as f64;
        self.wind_sum += data.wind_speed;

        if reading.id < self.first_id {
            self.first_id = reading.id;
            self.first_main = data.main.clone();
        }
    }

    fn finish(self, day: CalendarDay, city_name: String) -> DailySummary {
        let n = self.count as f64;
        DailySummary {
            city_name,
            date: day,
            average_temp: round1(self.temp_sum / n),
            max_temp: round1(self.temp_max),
            min_temp: round1(self.temp_min),
            avg_humidity: round1(self.humidity_sum / n),
            avg_wind_speed: round1(self.wind_sum / n),
            dominant_weather: self.first_main,
        }
    }
}

/// Group readings by (UTC day of `dt`, city) and summarize each group.
///
/// Output is ordered by year, month, day, then city name. The dominant
/// weather of a group is the condition of its lowest-id (first inserted)
/// reading, whatever order the readings arrive in. Readings whose `dt`
/// cannot be represented as a date are skipped.
pub fn summarize_by_day<'a, I>(readings: I) -> Vec<DailySummary>
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut groups: BTreeMap<(CalendarDay, String), DayAccumulator> = BTreeMap::new();

    for reading in readings {
        let Some(day) = CalendarDay::from_timestamp(reading.data.dt) else {
            continue;
        };
        groups
            .entry((day, reading.data.city_name.clone()))
            .or_insert_with(|| DayAccumulator::new(reading))
            .add(reading);
    }

    groups
        .into_iter()
        .map(|((day, city), acc)| acc.finish(day, city))
        .collect()
}
