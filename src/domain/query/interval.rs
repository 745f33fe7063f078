use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Longest span, in hours, the reporting API serves at five-minute resolution.
pub const FOUR_WEEKS_HOURS: i64 = 4 * 7 * 24;

/// Sampling granularity of the traffic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    /// Fine, 5-minute buckets.
    FiveMinutes,
    /// Coarse, 1-hour buckets.
    Hour,
}

impl Interval {
    /// Name used by the reporting API's `interval` parameter.
    pub fn as_code(&self) -> &'static str {
        match self {
            Interval::FiveMinutes => "FIVE_MINUTES",
            Interval::Hour => "HOUR",
        }
    }

    pub fn bucket(&self) -> Duration {
        match self {
            Interval::FiveMinutes => Duration::minutes(5),
            Interval::Hour => Duration::hours(1),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Picks the report interval for a time range and a point budget.
///
/// Ranges longer than four weeks, and ranges with at least one hour per
/// requested data point, use hourly buckets. Everything else is fine grained.
pub fn select_interval(from: DateTime<Utc>, to: DateTime<Utc>, max_data_points: u32) -> Interval {
    let span_hours = (to - from).num_hours();

    if span_hours > FOUR_WEEKS_HOURS {
        return Interval::Hour;
    }

    if span_hours >= i64::from(max_data_points) {
        return Interval::Hour;
    }

    Interval::FiveMinutes
}
