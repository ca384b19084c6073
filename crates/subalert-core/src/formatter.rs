//! Reminder message rendering.
//!
//! Matched subscriptions are summarized by display name (exact-match
//! deduplicated, first-seen order, blanks dropped) and dropped into a per-locale
//! template.

use serde::{Deserialize, Serialize};

use crate::classifier::{ExpiryBucket, ExpiryMatch, UsageLevel, UsageMatch};
use crate::subscription::Subscription;

/// Default number of names spelled out before the overflow suffix.
pub const DEFAULT_MAX_LISTED_NAMES: usize = 3;

/// Language of rendered messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-cn")]
    ZhCn,
}

impl Locale {
    fn separator(self) -> &'static str {
        match self {
            Locale::En => ", ",
            Locale::ZhCn => "、",
        }
    }

    fn unnamed(self) -> &'static str {
        match self {
            Locale::En => "unnamed subscription",
            Locale::ZhCn => "未命名订阅",
        }
    }
}

/// Renders reminder text for one locale.
#[derive(Debug, Clone)]
pub struct Formatter {
    locale: Locale,
    max_listed_names: usize,
    unnamed_label: Option<String>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl Formatter {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            max_listed_names: DEFAULT_MAX_LISTED_NAMES,
            unnamed_label: None,
        }
    }

    /// Clamp to at least one listed name.
    pub fn with_max_listed_names(mut self, max: usize) -> Self {
        self.max_listed_names = max.max(1);
        self
    }

    pub fn with_unnamed_label(mut self, label: Option<String>) -> Self {
        self.unnamed_label = label.filter(|l| !l.trim().is_empty());
        self
    }

    fn unnamed(&self) -> &str {
        self.unnamed_label
            .as_deref()
            .unwrap_or_else(|| self.locale.unnamed())
    }

    /// Comma-style list of distinct display names.
    pub fn summarize_names<'s>(&self, subscriptions: impl IntoIterator<Item = &'s Subscription>) -> String {
        let mut names: Vec<&str> = Vec::new();
        for name in subscriptions.into_iter().filter_map(Subscription::listed_name) {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        if names.is_empty() {
            return self.unnamed().to_string();
        }

        let sep = self.locale.separator();
        if names.len() <= self.max_listed_names {
            return names.join(sep);
        }

        let listed = names[..self.max_listed_names].join(sep);
        match self.locale {
            Locale::En => {
                let rest = names.len() - self.max_listed_names;
                let noun = if rest == 1 { "other" } else { "others" };
                format!("{listed} and {rest} {noun}")
            }
            Locale::ZhCn => format!("{listed} 等 {} 个", names.len()),
        }
    }

    pub fn usage_message(&self, level: UsageLevel, matches: &[UsageMatch<'_>]) -> String {
        let names = self.summarize_names(matches.iter().map(|m| m.subscription));
        let pct = level.percent();
        match self.locale {
            Locale::En => format!(
                "Usage alert: your subscription(s) have reached {pct}% of today's quota ({names})."
            ),
            Locale::ZhCn => format!("用量提醒：你的订阅今日用量已达 {pct}%（{names}）"),
        }
    }

    pub fn expiry_message(&self, bucket: ExpiryBucket, matches: &[ExpiryMatch<'_>]) -> String {
        let names = self.summarize_names(matches.iter().map(|m| m.subscription));
        let days = bucket.days();
        match (self.locale, days) {
            (Locale::En, 0) => format!("Expiry reminder: your subscription expires today ({names})."),
            (Locale::En, 1) => format!("Expiry reminder: your subscription expires in 1 day ({names})."),
            (Locale::En, n) => format!("Expiry reminder: your subscription expires in {n} days ({names})."),
            (Locale::ZhCn, 0) => format!("到期提醒：你的订阅今天到期（{names}）"),
            (Locale::ZhCn, n) => format!("到期提醒：你的订阅剩余 {n} 天到期（{names}）"),
        }
    }

    /// One line describing a single usage match.
    pub fn usage_detail(&self, m: &UsageMatch<'_>) -> String {
        let name = m.subscription.listed_name().unwrap_or_else(|| self.unnamed());
        match self.locale {
            Locale::En => format!(
                "{name}: {:.2} of {:.2} used today ({:.0}%)",
                m.used, m.limit, m.pct
            ),
            Locale::ZhCn => format!(
                "{name}：已用 {:.2} / 限额 {:.2}（{:.0}%）",
                m.used, m.limit, m.pct
            ),
        }
    }

    /// One line describing a single expiry match.
    pub fn expiry_detail(&self, m: &ExpiryMatch<'_>) -> String {
        let name = m.subscription.listed_name().unwrap_or_else(|| self.unnamed());
        let expires_at = m.subscription.expires_at.as_deref().unwrap_or_default();
        match self.locale {
            Locale::En => format!("{name}: expires at {expires_at}"),
            Locale::ZhCn => format!("{name}：到期时间 {expires_at}"),
        }
    }
}
