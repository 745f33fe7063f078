use chrono::{DateTime, Duration, DurationRound, Utc};
use tracing::{info, warn};

use super::interval::Interval;
use super::query_error::QueryError;

/// How far back the reporting API keeps traffic data.
pub const RETENTION_DAYS: i64 = 90;

/// A query window on interval boundaries, never starting before the
/// retention horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Rounds to the nearest interval boundary; halfway values round up.
pub fn round_to_interval(t: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    t.duration_round(interval.bucket()).unwrap_or_else(|err| {
        warn!(%t, %interval, %err, "Cannot round time to interval, using it unchanged");
        t
    })
}

/// Oldest sample the API still holds, as seen from `now`.
pub fn oldest_available(now: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    round_to_interval(now - Duration::days(RETENTION_DAYS), interval)
}

/// Aligns `[from, to)` to `interval` and clamps it to the retention horizon.
pub fn align_window(
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    interval: Interval,
    now: DateTime<Utc>,
) -> Result<AlignedWindow, QueryError> {
    let from_rounded = round_to_interval(from, interval);
    let to_rounded = round_to_interval(to, interval);
    let oldest = oldest_available(now, interval);

    if to_rounded < oldest {
        info!(%to_rounded, %oldest, "Requested window ends before available data");
        return Err(QueryError::WindowBeforeRetentionHorizon {
            oldest_available: oldest,
        });
    }

    Ok(AlignedWindow {
        from: from_rounded.max(oldest),
        to: to_rounded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        ts(2024, 6, 1, 12, 0, 0)
    }

    #[test]
    fn rounds_to_nearest_boundary() {
        let fine = Interval::FiveMinutes;
        assert_eq!(round_to_interval(ts(2024, 5, 20, 10, 2, 29), fine), ts(2024, 5, 20, 10, 0, 0));
        assert_eq!(round_to_interval(ts(2024, 5, 20, 10, 2, 30), fine), ts(2024, 5, 20, 10, 5, 0));
        assert_eq!(round_to_interval(ts(2024, 5, 20, 10, 7, 31), fine), ts(2024, 5, 20, 10, 10, 0));

        let coarse = Interval::Hour;
        assert_eq!(round_to_interval(ts(2024, 5, 20, 10, 29, 59), coarse), ts(2024, 5, 20, 10, 0, 0));
        assert_eq!(round_to_interval(ts(2024, 5, 20, 10, 30, 0), coarse), ts(2024, 5, 20, 11, 0, 0));
    }

    #[test]
    fn horizon_is_ninety_days_back_and_rounded() {
        assert_eq!(oldest_available(now(), Interval::Hour), ts(2024, 3, 3, 12, 0, 0));
        let off_boundary = ts(2024, 6, 1, 12, 44, 0);
        assert_eq!(oldest_available(off_boundary, Interval::FiveMinutes), ts(2024, 3, 3, 12, 45, 0));
        assert_eq!(oldest_available(off_boundary, Interval::Hour), ts(2024, 3, 3, 13, 0, 0));
    }

    #[test]
    fn aligns_both_ends() {
        let window = align_window(
            ts(2024, 5, 20, 10, 1, 0),
            ts(2024, 5, 20, 13, 33, 0),
            Interval::FiveMinutes,
            now(),
        )
        .unwrap();

        assert_eq!(window.from, ts(2024, 5, 20, 10, 0, 0));
        assert_eq!(window.to, ts(2024, 5, 20, 13, 35, 0));
    }

    #[test]
    fn aligning_an_aligned_window_is_a_no_op() {
        for interval in [Interval::FiveMinutes, Interval::Hour] {
            let first = align_window(
                ts(2024, 2, 1, 3, 17, 12),
                ts(2024, 5, 31, 22, 41, 5),
                interval,
                now(),
            )
            .unwrap();
            let second = align_window(first.from, first.to, interval, now()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn clamps_start_to_the_horizon() {
        let window = align_window(
            ts(2024, 1, 1, 0, 0, 0),
            ts(2024, 5, 1, 0, 0, 0),
            Interval::Hour,
            now(),
        )
        .unwrap();

        assert_eq!(window.from, ts(2024, 3, 3, 12, 0, 0));
        assert_eq!(window.to, ts(2024, 5, 1, 0, 0, 0));
    }

    #[test]
    fn end_on_the_horizon_is_accepted() {
        let window = align_window(
            ts(2024, 3, 1, 0, 0, 0),
            ts(2024, 3, 3, 12, 0, 0),
            Interval::Hour,
            now(),
        )
        .unwrap();

        assert_eq!(window.from, window.to);
    }

    #[test]
    fn end_before_the_horizon_is_rejected() {
        let err = align_window(
            ts(2024, 2, 1, 0, 0, 0),
            ts(2024, 3, 3, 11, 0, 0),
            Interval::Hour,
            now(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            QueryError::WindowBeforeRetentionHorizon {
                oldest_available: ts(2024, 3, 3, 12, 0, 0)
            }
        );
    }
}
