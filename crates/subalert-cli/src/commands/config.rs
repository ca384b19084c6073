use clap::Subcommand;
use subalert_core::Config;

use crate::Globals;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "reminders.locale", "ledger.backend")
        key: String,
    },
    /// Set a config value
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction, globals: &Globals) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = globals.load_file()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = globals.load_file()?;
            config.apply(&key, &value)?;
            globals.save_config(&config)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = globals.load_file()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            globals.save_config(&Config::default())?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
