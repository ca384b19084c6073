use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use subalert_core::{
    AnyStore, Clock, FixedClock, MemoryStore, NotifyContext, RecordingSink, ReminderEngine, StoreLedger, Subscription,
    SystemClock,
};

use crate::Globals;

#[derive(Args)]
pub struct CheckArgs {
    /// JSON array of subscriptions, or "-" for stdin
    #[arg(long, short)]
    input: PathBuf,
    /// Treat this as an administrative screen (nothing is shown)
    #[arg(long)]
    admin: bool,
    /// Pretend the current time is this RFC 3339 instant
    #[arg(long)]
    now: Option<String>,
    /// Output the shown reminders as JSON
    #[arg(long)]
    json: bool,
    /// Print one detail line per included subscription
    #[arg(long)]
    verbose: bool,
}

pub fn run(args: CheckArgs, globals: &Globals) -> Result<(), Box<dyn std::error::Error>> {
    let config = globals.load_config_or_default();
    let subscriptions = read_subscriptions(&args.input)?;

    let clock = match &args.now {
        Some(raw) => FixedClock::parse(raw).map_err(|e| format!("invalid --now '{raw}': {e}"))?,
        None => FixedClock::new(SystemClock.now()),
    };

    let store = AnyStore::open(&config.ledger).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ledger store unavailable, reminders will not be deduplicated");
        AnyStore::Memory(MemoryStore::new())
    });
    let ledger = StoreLedger::new(store);
    let mut engine = ReminderEngine::with_clock(ledger, clock).with_config(config.reminders);
    let context = if args.admin {
        NotifyContext::admin()
    } else {
        NotifyContext::user()
    };

    let mut sink = RecordingSink::new();
    let shown = engine.notify(&subscriptions, &mut sink, &context)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No reminders due.");
    }
    for notification in &shown {
        println!("{}", notification.text);
        if args.verbose {
            for detail in &notification.details {
                println!("  - {detail}");
            }
        }
    }
    Ok(())
}

fn read_subscriptions(input: &Path) -> Result<Vec<Subscription>, Box<dyn std::error::Error>> {
    let content = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input).map_err(|e| format!("cannot read {}: {e}", input.display()))?
    };
    let subscriptions: Vec<Subscription> = serde_json::from_str(&content)?;
    tracing::debug!(count = subscriptions.len(), "loaded subscriptions");
    Ok(subscriptions)
}
