//! Ledger key layout.
//!
//! Keys are part of the persisted contract; the layout must not change or
//! previously-set flags stop matching:
//!
//! - `reminder:daily95:{id}:{YYYY-MM-DD}`
//! - `reminder:daily80:{id}:{YYYY-MM-DD}`
//! - `reminder:expiry:{id}:{days}:{YYYY-MM-DD}`

use chrono::NaiveDate;
use std::fmt;

use crate::classifier::{ExpiryBucket, UsageLevel};
use crate::subscription::SubscriptionId;

const PREFIX: &str = "reminder";

/// A fully-qualified suppression flag key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagKey(String);

impl FlagKey {
    pub fn usage(level: UsageLevel, id: &SubscriptionId, day_key: &str) -> Self {
        Self(format!("{PREFIX}:{}:{id}:{day_key}", level.flag_tag()))
    }

    pub fn expiry(bucket: ExpiryBucket, id: &SubscriptionId, day_key: &str) -> Self {
        Self(format!("{PREFIX}:expiry:{id}:{}:{day_key}", bucket.days()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing `YYYY-MM-DD` of a raw key, if it has one.
    pub fn day_of(raw: &str) -> Option<&str> {
        if !raw.starts_with(PREFIX) {
            return None;
        }
        let (_, day) = raw.rsplit_once(':')?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
        Some(day)
    }
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
