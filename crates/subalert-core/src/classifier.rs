//! Threshold classification of subscriptions.
//!
//! Each subscription is checked on two independent axes:
//!
//! - **Usage**: percent of the daily limit, bucketed at 95% and 80%. The 95%
//!   bucket takes precedence, so a subscription lands in at most one usage
//!   pool.
//! - **Expiry**: whole days remaining, tracked only at 0, 1 and 3.
//!
//! Matches whose flag for today is already in the ledger are dropped here,
//! so every pool only holds reminders that are still due.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::clock::days_remaining;
use crate::ledger::{FlagKey, Ledger};
use crate::subscription::Subscription;

/// Usage threshold a subscription has crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevel {
    /// At or above 95% of the daily limit
    Critical,
    /// At or above 80% but below 95%
    Warning,
}

impl UsageLevel {
    /// Highest priority first.
    pub const PRIORITY: [UsageLevel; 2] = [UsageLevel::Critical, UsageLevel::Warning];

    pub fn percent(self) -> u32 {
        match self {
            UsageLevel::Critical => 95,
            UsageLevel::Warning => 80,
        }
    }

    /// Category segment of the ledger key.
    pub fn flag_tag(self) -> &'static str {
        match self {
            UsageLevel::Critical => "daily95",
            UsageLevel::Warning => "daily80",
        }
    }

    /// The level for a usage percentage, if any threshold is crossed.
    pub fn from_percent(pct: f64) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|level| pct >= f64::from(level.percent()))
    }
}

/// Days-to-expiry bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryBucket {
    Today,
    Tomorrow,
    ThreeDays,
}

impl ExpiryBucket {
    /// Highest priority first.
    pub const PRIORITY: [ExpiryBucket; 3] = [
        ExpiryBucket::Today,
        ExpiryBucket::Tomorrow,
        ExpiryBucket::ThreeDays,
    ];

    pub fn days(self) -> i64 {
        match self {
            ExpiryBucket::Today => 0,
            ExpiryBucket::Tomorrow => 1,
            ExpiryBucket::ThreeDays => 3,
        }
    }

    pub fn from_days(days: i64) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|bucket| bucket.days() == days)
    }
}

/// A subscription over a usage threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageMatch<'a> {
    pub subscription: &'a Subscription,
    pub pct: f64,
    pub used: f64,
    pub limit: f64,
}

/// A subscription inside a tracked expiry bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpiryMatch<'a> {
    pub subscription: &'a Subscription,
    pub days: i64,
}

/// Un-suppressed matches of one invocation, partitioned by threshold.
#[derive(Debug, Default)]
pub struct Classification<'a> {
    pub usage95: Vec<UsageMatch<'a>>,
    pub usage80: Vec<UsageMatch<'a>>,
    pub expiry0: Vec<ExpiryMatch<'a>>,
    pub expiry1: Vec<ExpiryMatch<'a>>,
    pub expiry3: Vec<ExpiryMatch<'a>>,
}

impl<'a> Classification<'a> {
    pub fn usage_pool(&self, level: UsageLevel) -> &[UsageMatch<'a>] {
        match level {
            UsageLevel::Critical => &self.usage95,
            UsageLevel::Warning => &self.usage80,
        }
    }

    pub fn expiry_pool(&self, bucket: ExpiryBucket) -> &[ExpiryMatch<'a>] {
        match bucket {
            ExpiryBucket::Today => &self.expiry0,
            ExpiryBucket::Tomorrow => &self.expiry1,
            ExpiryBucket::ThreeDays => &self.expiry3,
        }
    }

    pub fn is_empty(&self) -> bool {
        UsageLevel::PRIORITY
            .into_iter()
            .all(|level| self.usage_pool(level).is_empty())
            && ExpiryBucket::PRIORITY
                .into_iter()
                .all(|bucket| self.expiry_pool(bucket).is_empty())
    }

    fn usage_pool_mut(&mut self, level: UsageLevel) -> &mut Vec<UsageMatch<'a>> {
        match level {
            UsageLevel::Critical => &mut self.usage95,
            UsageLevel::Warning => &mut self.usage80,
        }
    }

    fn expiry_pool_mut(&mut self, bucket: ExpiryBucket) -> &mut Vec<ExpiryMatch<'a>> {
        match bucket {
            ExpiryBucket::Today => &mut self.expiry0,
            ExpiryBucket::Tomorrow => &mut self.expiry1,
            ExpiryBucket::ThreeDays => &mut self.expiry3,
        }
    }
}

/// Classify every subscription against today's ledger state.
pub fn classify<'a, L: Ledger + ?Sized>(
    subscriptions: &'a [Subscription],
    ledger: &L,
    day_key: &str,
    now: &DateTime<FixedOffset>,
) -> Classification<'a> {
    let mut out = Classification::default();

    for sub in subscriptions {
        if let Some((level, m)) = classify_usage(sub) {
            if ledger.has(&FlagKey::usage(level, &sub.id, day_key)) {
                tracing::debug!(id = %sub.id, level = level.percent(), "usage reminder already shown today");
            } else {
                out.usage_pool_mut(level).push(m);
            }
        }

        if let Some((bucket, m)) = classify_expiry(sub, now) {
            if ledger.has(&FlagKey::expiry(bucket, &sub.id, day_key)) {
                tracing::debug!(id = %sub.id, days = bucket.days(), "expiry reminder already shown today");
            } else {
                out.expiry_pool_mut(bucket).push(m);
            }
        }
    }

    out
}

fn classify_usage(sub: &Subscription) -> Option<(UsageLevel, UsageMatch<'_>)> {
    let limit = sub.daily_limit()?;
    let pct = sub.usage_percent()?;
    let level = UsageLevel::from_percent(pct)?;
    Some((
        level,
        UsageMatch {
            subscription: sub,
            pct,
            used: sub.usage.used,
            limit,
        },
    ))
}

fn classify_expiry<'a>(
    sub: &'a Subscription,
    now: &DateTime<FixedOffset>,
) -> Option<(ExpiryBucket, ExpiryMatch<'a>)> {
    let expires_at = sub.expires_at.as_deref()?;
    let days = days_remaining(expires_at, now)?;
    let bucket = ExpiryBucket::from_days(days)?;
    Some((bucket, ExpiryMatch { subscription: sub, days }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryStore, StoreLedger};
    use chrono::Duration;
    use proptest::prelude::*;

    const DAY: &str = "2026-06-15";

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-06-15T10:00:00+00:00").unwrap()
    }

    fn in_days(days: i64) -> String {
        (now() + Duration::days(days)).to_rfc3339()
    }

    fn empty_ledger() -> StoreLedger<MemoryStore> {
        StoreLedger::new(MemoryStore::new())
    }

    #[test]
    fn usage_levels_from_percent() {
        assert_eq!(UsageLevel::from_percent(100.0), Some(UsageLevel::Critical));
        assert_eq!(UsageLevel::from_percent(95.0), Some(UsageLevel::Critical));
        assert_eq!(UsageLevel::from_percent(94.99), Some(UsageLevel::Warning));
        assert_eq!(UsageLevel::from_percent(80.0), Some(UsageLevel::Warning));
        assert_eq!(UsageLevel::from_percent(79.99), None);
    }

    #[test]
    fn expiry_buckets_from_days() {
        assert_eq!(ExpiryBucket::from_days(0), Some(ExpiryBucket::Today));
        assert_eq!(ExpiryBucket::from_days(1), Some(ExpiryBucket::Tomorrow));
        assert_eq!(ExpiryBucket::from_days(2), None);
        assert_eq!(ExpiryBucket::from_days(3), Some(ExpiryBucket::ThreeDays));
        assert_eq!(ExpiryBucket::from_days(7), None);
    }

    #[test]
    fn partitions_by_usage() {
        let subs = vec![
            Subscription::new(1u64).with_usage(96.0, 100.0),
            Subscription::new(2u64).with_usage(82.0, 100.0),
            Subscription::new(3u64).with_usage(10.0, 100.0),
            Subscription::new(4u64).with_usage(500.0, 0.0),
        ];
        let c = classify(&subs, &empty_ledger(), DAY, &now());

        assert_eq!(c.usage95.len(), 1);
        assert_eq!(c.usage95[0].subscription.id.as_str(), "1");
        assert!((c.usage95[0].pct - 96.0).abs() < 1e-9);
        assert_eq!(c.usage80.len(), 1);
        assert_eq!(c.usage80[0].subscription.id.as_str(), "2");
    }

    #[test]
    fn partitions_by_expiry() {
        let subs = vec![
            Subscription::new(1u64).expiring_at(in_days(0)),
            Subscription::new(2u64).expiring_at(in_days(1)),
            Subscription::new(3u64).expiring_at(in_days(2)),
            Subscription::new(4u64).expiring_at(in_days(3)),
            Subscription::new(5u64).expiring_at("not a date"),
            Subscription::new(6u64).expiring_at(in_days(-2)),
        ];
        let c = classify(&subs, &empty_ledger(), DAY, &now());

        assert_eq!(c.expiry0.len(), 1);
        assert_eq!(c.expiry1.len(), 1);
        assert_eq!(c.expiry3.len(), 1);
        assert_eq!(c.expiry3[0].subscription.id.as_str(), "4");
        assert_eq!(c.expiry3[0].days, 3);
    }

    #[test]
    fn one_subscription_can_match_both_axes() {
        let subs = vec![Subscription::new(1u64)
            .with_usage(99.0, 100.0)
            .expiring_at(in_days(1))];
        let c = classify(&subs, &empty_ledger(), DAY, &now());
        assert_eq!(c.usage95.len(), 1);
        assert_eq!(c.expiry1.len(), 1);
    }

    #[test]
    fn flagged_matches_are_suppressed() {
        let subs = vec![
            Subscription::new(1u64).with_usage(96.0, 100.0),
            Subscription::new(2u64).expiring_at(in_days(3)),
        ];
        let mut ledger = empty_ledger();
        ledger.set(&FlagKey::usage(UsageLevel::Critical, &subs[0].id, DAY));
        ledger.set(&FlagKey::expiry(ExpiryBucket::ThreeDays, &subs[1].id, DAY));

        let c = classify(&subs, &ledger, DAY, &now());
        assert!(c.is_empty());
    }

    #[test]
    fn flag_for_another_level_does_not_suppress() {
        let subs = vec![Subscription::new(1u64).with_usage(96.0, 100.0)];
        let mut ledger = empty_ledger();
        ledger.set(&FlagKey::usage(UsageLevel::Warning, &subs[0].id, DAY));

        let c = classify(&subs, &ledger, DAY, &now());
        assert_eq!(c.usage95.len(), 1);
    }

    #[test]
    fn flag_from_yesterday_does_not_suppress() {
        let subs = vec![Subscription::new(1u64).with_usage(96.0, 100.0)];
        let mut ledger = empty_ledger();
        ledger.set(&FlagKey::usage(UsageLevel::Critical, &subs[0].id, "2026-06-14"));

        let c = classify(&subs, &ledger, DAY, &now());
        assert_eq!(c.usage95.len(), 1);
    }

    proptest! {
        #[test]
        fn at_most_one_usage_pool(used in 0.0f64..500.0, limit in 0.0f64..500.0) {
            let subs = vec![Subscription::new(1u64).with_usage(used, limit)];
            let c = classify(&subs, &empty_ledger(), DAY, &now());
            prop_assert!(c.usage95.len() + c.usage80.len() <= 1);
            if limit > 0.0 && used / limit * 100.0 >= 95.0 {
                prop_assert_eq!(c.usage95.len(), 1);
            }
        }

        #[test]
        fn expired_items_never_match(hours_ago in 24i64..24 * 365) {
            let expires_at = (now() - Duration::hours(hours_ago) - Duration::seconds(1)).to_rfc3339();
            let subs = vec![Subscription::new(1u64).expiring_at(expires_at)];
            let c = classify(&subs, &empty_ledger(), DAY, &now());
            prop_assert!(c.is_empty());
        }
    }
}
