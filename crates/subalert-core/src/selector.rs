//! Per-category priority selection.
//!
//! Candidate pools are walked in fixed priority order and the first
//! non-empty one wins. Lower-priority pools wait for a later call.

use crate::classifier::{Classification, ExpiryBucket, ExpiryMatch, UsageLevel, UsageMatch};

/// The pool chosen for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'c, K, M> {
    pub level: K,
    pub matches: &'c [M],
}

pub type UsageSelection<'c, 'a> = Selection<'c, UsageLevel, UsageMatch<'a>>;
pub type ExpirySelection<'c, 'a> = Selection<'c, ExpiryBucket, ExpiryMatch<'a>>;

fn first_non_empty<'c, K, M: 'c>(
    candidates: impl IntoIterator<Item = (K, &'c [M])>,
) -> Option<Selection<'c, K, M>> {
    candidates
        .into_iter()
        .find(|(_, pool)| !pool.is_empty())
        .map(|(level, matches)| Selection { level, matches })
}

/// 95% beats 80%.
pub fn select_usage<'c, 'a>(classification: &'c Classification<'a>) -> Option<UsageSelection<'c, 'a>> {
    first_non_empty(
        UsageLevel::PRIORITY.map(move |level| (level, classification.usage_pool(level))),
    )
}

/// Today beats tomorrow beats three days out.
pub fn select_expiry<'c, 'a>(classification: &'c Classification<'a>) -> Option<ExpirySelection<'c, 'a>> {
    first_non_empty(
        ExpiryBucket::PRIORITY.map(move |bucket| (bucket, classification.expiry_pool(bucket))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::Subscription;

    fn usage(sub: &Subscription, pct: f64) -> UsageMatch<'_> {
        UsageMatch {
            subscription: sub,
            pct,
            used: pct,
            limit: 100.0,
        }
    }

    fn expiry(sub: &Subscription, days: i64) -> ExpiryMatch<'_> {
        ExpiryMatch {
            subscription: sub,
            days,
        }
    }

    #[test]
    fn nothing_to_select() {
        let c = Classification::default();
        assert!(select_usage(&c).is_none());
        assert!(select_expiry(&c).is_none());
    }

    #[test]
    fn critical_usage_shadows_warning() {
        let a = Subscription::new(1u64);
        let b = Subscription::new(2u64);
        let c = Classification {
            usage95: vec![usage(&a, 97.0)],
            usage80: vec![usage(&b, 85.0)],
            ..Default::default()
        };

        let sel = select_usage(&c).unwrap();
        assert_eq!(sel.level, UsageLevel::Critical);
        assert_eq!(sel.matches.len(), 1);
        assert_eq!(sel.matches[0].subscription.id.as_str(), "1");
    }

    #[test]
    fn warning_usage_when_alone() {
        let b = Subscription::new(2u64);
        let c = Classification {
            usage80: vec![usage(&b, 85.0)],
            ..Default::default()
        };
        assert_eq!(select_usage(&c).unwrap().level, UsageLevel::Warning);
    }

    #[test]
    fn expiry_prefers_nearest_bucket() {
        let a = Subscription::new(1u64);
        let b = Subscription::new(2u64);
        let c = Classification {
            expiry1: vec![expiry(&a, 1)],
            expiry3: vec![expiry(&b, 3)],
            ..Default::default()
        };
        assert_eq!(select_expiry(&c).unwrap().level, ExpiryBucket::Tomorrow);

        let c = Classification {
            expiry0: vec![expiry(&b, 0)],
            ..c
        };
        let sel = select_expiry(&c).unwrap();
        assert_eq!(sel.level, ExpiryBucket::Today);
        assert_eq!(sel.matches[0].subscription.id.as_str(), "2");
    }

    #[test]
    fn categories_are_independent() {
        let a = Subscription::new(1u64);
        let c = Classification {
            usage80: vec![usage(&a, 81.0)],
            expiry3: vec![expiry(&a, 3)],
            ..Default::default()
        };
        assert_eq!(select_usage(&c).unwrap().level, UsageLevel::Warning);
        assert_eq!(select_expiry(&c).unwrap().level, ExpiryBucket::ThreeDays);
    }
}
