//! Reminder orchestration.
//!
//! One [`ReminderEngine::notify`] call classifies the subscriptions, picks
//! at most one usage pool and one expiry pool, marks every subscription in
//! a picked pool in the ledger, and hands the rendered text to the sink.
//! Nothing runs in the background; the host decides when to call.

use serde::{Deserialize, Serialize};

use crate::classifier::classify;
use crate::clock::{local_day_key, Clock, SystemClock};
use crate::error::{ReminderError, Result};
use crate::formatter::Formatter;
use crate::ledger::{FlagKey, Ledger};
use crate::selector::{select_expiry, select_usage};
use crate::sink::MessageSink;
use crate::storage::ReminderConfig;
use crate::subscription::{Subscription, SubscriptionId};

/// Per-call context from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyContext {
    /// Reminders are never shown in administrative screens.
    pub is_admin_context: bool,
}

impl NotifyContext {
    pub fn user() -> Self {
        Self {
            is_admin_context: false,
        }
    }

    pub fn admin() -> Self {
        Self {
            is_admin_context: true,
        }
    }
}

/// Reminder category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Usage,
    Expiry,
}

/// A reminder that was handed to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Percent threshold for usage, days remaining for expiry.
    pub level: u32,
    pub text: String,
    pub duration_ms: u64,
    pub subscription_ids: Vec<SubscriptionId>,
    /// One line per included subscription.
    pub details: Vec<String>,
}

/// Decides which reminders to show and remembers what was shown today.
pub struct ReminderEngine<L, C = SystemClock> {
    ledger: L,
    clock: C,
    config: ReminderConfig,
    formatter: Formatter,
}

impl<L: Ledger> ReminderEngine<L> {
    /// Engine on the system clock with default settings.
    pub fn new(ledger: L) -> Self {
        Self::with_clock(ledger, SystemClock)
    }
}

impl<L: Ledger, C: Clock> ReminderEngine<L, C> {
    pub fn with_clock(ledger: L, clock: C) -> Self {
        let config = ReminderConfig::default();
        Self {
            formatter: formatter_for(&config),
            ledger,
            clock,
            config,
        }
    }

    pub fn with_config(mut self, config: ReminderConfig) -> Self {
        self.formatter = formatter_for(&config);
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }

    /// Show whichever reminders are due right now.
    ///
    /// Emits at most one usage and one expiry reminder. Returns what was
    /// shown, in order.
    ///
    /// # Errors
    /// Only sink failures are returned; ledger failures are absorbed.
    pub fn notify<S: MessageSink + ?Sized>(
        &mut self,
        subscriptions: &[Subscription],
        sink: &mut S,
        context: &NotifyContext,
    ) -> Result<Vec<Notification>> {
        if context.is_admin_context {
            tracing::debug!("admin context, skipping reminders");
            return Ok(Vec::new());
        }
        if !self.config.enabled {
            tracing::debug!("reminders disabled");
            return Ok(Vec::new());
        }
        if subscriptions.is_empty() {
            tracing::debug!("no subscriptions to check");
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let day_key = local_day_key(&now);
        let classification = classify(subscriptions, &self.ledger, &day_key, &now);

        let mut emitted = Vec::with_capacity(2);

        if let Some(selection) = select_usage(&classification) {
            tracing::debug!(level = selection.level.percent(), count = selection.matches.len(), "selected usage pool");
            for m in selection.matches {
                self.ledger
                    .set(&FlagKey::usage(selection.level, &m.subscription.id, &day_key));
            }
            let notification = Notification {
                kind: NotificationKind::Usage,
                level: selection.level.percent(),
                text: self.formatter.usage_message(selection.level, selection.matches),
                duration_ms: self.config.usage_duration_ms,
                subscription_ids: ids(selection.matches.iter().map(|m| m.subscription)),
                details: selection
                    .matches
                    .iter()
                    .map(|m| self.formatter.usage_detail(m))
                    .collect(),
            };
            emit(sink, &notification)?;
            emitted.push(notification);
        }

        if let Some(selection) = select_expiry(&classification) {
            tracing::debug!(days = selection.level.days(), count = selection.matches.len(), "selected expiry pool");
            for m in selection.matches {
                self.ledger
                    .set(&FlagKey::expiry(selection.level, &m.subscription.id, &day_key));
            }
            let notification = Notification {
                kind: NotificationKind::Expiry,
                // bucket days are 0, 1 or 3
                level: selection.level.days() as u32,
                text: self.formatter.expiry_message(selection.level, selection.matches),
                duration_ms: self.config.expiry_duration_ms,
                subscription_ids: ids(selection.matches.iter().map(|m| m.subscription)),
                details: selection
                    .matches
                    .iter()
                    .map(|m| self.formatter.expiry_detail(m))
                    .collect(),
            };
            emit(sink, &notification)?;
            emitted.push(notification);
        }

        Ok(emitted)
    }
}

fn formatter_for(config: &ReminderConfig) -> Formatter {
    Formatter::new(config.locale)
        .with_max_listed_names(config.max_listed_names)
        .with_unnamed_label(config.unnamed_label.clone())
}

fn ids<'a>(subscriptions: impl Iterator<Item = &'a Subscription>) -> Vec<SubscriptionId> {
    subscriptions.map(|s| s.id.clone()).collect()
}

fn emit<S: MessageSink + ?Sized>(sink: &mut S, notification: &Notification) -> Result<()> {
    tracing::info!(
        kind = ?notification.kind,
        level = notification.level,
        count = notification.subscription_ids.len(),
        "showing reminder"
    );
    sink.show(&notification.text, notification.duration_ms)
        .map_err(ReminderError::Sink)
}
