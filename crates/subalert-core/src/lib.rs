//! # Subalert Core Library
//!
//! This library decides which subscription reminders a user should see
//! right now. Given the user's subscriptions, it classifies each one by
//! daily quota usage and days until expiry, picks at most one reminder per
//! category, and remembers what it already showed today so the same
//! reminder is not repeated until the local date changes.
//!
//! ## Architecture
//!
//! - **Clock**: local day keys and whole-day countdowns
//! - **Ledger**: best-effort "already shown" flags over a pluggable
//!   key-value store (memory, JSON file, SQLite)
//! - **Classifier / Selector**: threshold buckets and fixed-priority picks
//! - **Formatter**: name summaries and per-locale message templates
//! - **Engine**: the `notify` entry point tying it together
//!
//! ## Key Components
//!
//! - [`ReminderEngine`]: Orchestrates one reminder pass
//! - [`Ledger`]: Suppression flag capability
//! - [`MessageSink`]: Where reminders are shown
//! - [`Config`]: Application configuration management

pub mod classifier;
pub mod clock;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod ledger;
pub mod selector;
pub mod sink;
pub mod storage;
pub mod subscription;

pub use classifier::{classify, Classification, ExpiryBucket, ExpiryMatch, UsageLevel, UsageMatch};
pub use clock::{days_remaining, local_day_key, Clock, FixedClock, SystemClock};
pub use engine::{Notification, NotificationKind, NotifyContext, ReminderEngine};
pub use error::{ConfigError, ReminderError, SinkError, StoreError};
pub use formatter::{Formatter, Locale};
pub use ledger::{FlagKey, KeyValueStore, Ledger, MemoryStore, PrunableStore, StoreLedger};
pub use selector::{select_expiry, select_usage, Selection};
pub use sink::{MessageSink, RecordingSink, ShownMessage};
pub use storage::{AnyStore, Config, JsonFileStore, LedgerBackend, LedgerConfig, ReminderConfig, SqliteStore};
pub use subscription::{Subscription, SubscriptionId, Usage};
