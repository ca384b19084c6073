//! Monitored subscriptions as supplied by the host application.
//!
//! The engine only reads these; it never mutates or stores them.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Opaque, stable subscription identifier.
///
/// Hosts send either numeric or string ids; both are kept as text so they
/// can be embedded in ledger keys unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawId")]
pub struct SubscriptionId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl From<RawId> for SubscriptionId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for SubscriptionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for SubscriptionId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Today's spend against the daily quota.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub used: f64,
    /// `None` or a non-positive value means the quota is not tracked.
    #[serde(default)]
    pub limit: Option<f64>,
}

/// A monitored subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Expiry timestamp as sent by the host; parsed lazily.
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl Subscription {
    pub fn new(id: impl Into<SubscriptionId>) -> Self {
        Self {
            id: id.into(),
            usage: Usage::default(),
            display_name: None,
            expires_at: None,
        }
    }

    pub fn with_usage(mut self, used: f64, limit: f64) -> Self {
        self.usage = Usage {
            used,
            limit: Some(limit),
        };
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn expiring_at(mut self, expires_at: impl Into<String>) -> Self {
        self.expires_at = Some(expires_at.into());
        self
    }

    /// The daily limit, if a positive one is configured.
    pub fn daily_limit(&self) -> Option<f64> {
        self.usage.limit.filter(|limit| *limit > 0.0)
    }

    /// Percent of the daily limit consumed, if the quota is tracked.
    pub fn usage_percent(&self) -> Option<f64> {
        self.daily_limit()
            .map(|limit| self.usage.used / limit * 100.0)
    }

    /// Display name as sent, unless it is blank.
    pub fn listed_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}
