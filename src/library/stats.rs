//! Dashboard counters derived from the library sequence.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{ItemKind, LibraryItem};

/// Number of weekly activity buckets
pub const WEEK_BUCKETS: usize = 4;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Aggregate counts over the library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total: usize,
    pub scripts: usize,
    pub posts: usize,
    pub used: usize,
    /// Items created in the last 1-7, 8-14, 15-21 and 22-28 days
    pub weekly_activity: [usize; WEEK_BUCKETS],
}

impl LibraryStats {
    /// Compute counters relative to `now`
    pub fn compute(items: &[LibraryItem], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total: items.len(),
            ..Self::default()
        };

        for item in items {
            match item.kind() {
                ItemKind::Script => stats.scripts += 1,
                ItemKind::Post => stats.posts += 1,
            }
            if item.is_used() {
                stats.used += 1;
            }
            if let Some(bucket) = week_bucket(item.created_at(), now) {
                stats.weekly_activity[bucket] += 1;
            }
        }

        stats
    }
}

/// Days are rounded up, so anything within the first 7 days lands in bucket 0.
/// Items dated after `now` belong to no bucket.
fn week_bucket(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<usize> {
    let millis = (now - created_at).num_milliseconds();
    if millis < 0 {
        return None;
    }
    let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    let bucket = (days.max(1) - 1) / 7;
    usize::try_from(bucket).ok().filter(|b| *b < WEEK_BUCKETS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_week_bucket_boundaries() {
        let now = now();
        assert_eq!(week_bucket(now, now), Some(0));
        assert_eq!(week_bucket(now - Duration::days(7), now), Some(0));
        assert_eq!(week_bucket(now - Duration::days(7) - Duration::hours(1), now), Some(1));
        assert_eq!(week_bucket(now - Duration::days(14), now), Some(1));
        assert_eq!(week_bucket(now - Duration::days(21), now), Some(2));
        assert_eq!(week_bucket(now - Duration::days(28), now), Some(3));
        assert_eq!(week_bucket(now - Duration::days(29), now), None);
    }

    #[test]
    fn test_future_items_are_not_bucketed() {
        let now = now();
        assert_eq!(week_bucket(now + Duration::hours(1), now), None);
        assert_eq!(week_bucket(now + Duration::days(3), now), None);
    }

    #[test]
    fn test_empty_library() {
        assert_eq!(LibraryStats::compute(&[], now()), LibraryStats::default());
    }
}
