use chrono::NaiveDate;
use clap::Subcommand;
use subalert_core::ledger::FLAG_SET;
use subalert_core::{AnyStore, KeyValueStore, PrunableStore};

use crate::Globals;

#[derive(Subcommand)]
pub enum LedgerAction {
    /// List stored flags
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete flags from days before the given date
    Prune {
        /// Keep flags on or after this day (YYYY-MM-DD)
        #[arg(long)]
        before: String,
    },
    /// Check whether a flag is set
    Has {
        /// Full flag key, e.g. "reminder:daily95:42:2026-09-01"
        key: String,
    },
}

pub fn run(action: LedgerAction, globals: &Globals) -> Result<(), Box<dyn std::error::Error>> {
    let config = globals.load_config()?;
    let mut store = AnyStore::open(&config.ledger)?;

    match action {
        LedgerAction::List { json } => {
            let mut entries = Vec::new();
            for key in store.keys()? {
                let value = store.get(&key)?.unwrap_or_default();
                entries.push((key, value));
            }
            if json {
                let map: serde_json::Map<String, serde_json::Value> = entries
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else if entries.is_empty() {
                println!("No flags stored.");
            } else {
                for (key, value) in entries {
                    println!("{key} = {value}");
                }
            }
        }
        LedgerAction::Prune { before } => {
            let day = NaiveDate::parse_from_str(before.trim(), "%Y-%m-%d")
                .map_err(|e| format!("invalid date '{before}': {e}"))?;
            let removed = store.prune_before(&day.format("%Y-%m-%d").to_string())?;
            println!("Removed {removed} flag(s)");
        }
        LedgerAction::Has { key } => {
            println!("{}", store.get(&key)?.as_deref() == Some(FLAG_SET));
        }
    }
    Ok(())
}
