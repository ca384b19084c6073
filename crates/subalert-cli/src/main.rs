use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use subalert_core::{Config, LedgerBackend};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "subalert", version, about = "Subscription reminder CLI")]
struct Cli {
    /// Use this config file instead of ~/.config/subalert/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured ledger backend
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    /// Override the configured ledger location
    #[arg(long, global = true)]
    ledger_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one reminder pass over a subscriptions file
    Check(commands::check::CheckArgs),
    /// Inspect and maintain the dedup ledger
    Ledger {
        #[command(subcommand)]
        action: commands::ledger::LedgerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Sqlite,
    File,
    Memory,
}

impl From<BackendArg> for LedgerBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sqlite => LedgerBackend::Sqlite,
            BackendArg::File => LedgerBackend::File,
            BackendArg::Memory => LedgerBackend::Memory,
        }
    }
}

/// Options shared by every subcommand.
pub struct Globals {
    pub config: Option<PathBuf>,
    pub backend: Option<BackendArg>,
    pub ledger_path: Option<PathBuf>,
}

impl Globals {
    /// Load the config file as stored, ignoring command-line overrides.
    pub fn load_file(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) if path.exists() => Config::load_from(path)?,
            Some(_) => Config::default(),
            None => Config::load()?,
        };
        Ok(config)
    }

    /// Load the config file and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = self.load_file()?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Like [`Globals::load_config`], but an unreadable file means defaults.
    pub fn load_config_or_default(&self) -> Config {
        let mut config = match &self.config {
            Some(path) if path.exists() => Config::load_from(path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default configuration");
                Config::default()
            }),
            Some(_) => Config::default(),
            None => Config::load_or_default(),
        };
        self.apply_overrides(&mut config);
        config
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(backend) = self.backend {
            config.ledger.backend = backend.into();
        }
        if let Some(path) = &self.ledger_path {
            config.ledger.path = Some(path.clone());
        }
    }

    /// Persist `config` to wherever it was loaded from.
    pub fn save_config(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.config {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SUBALERT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let globals = Globals {
        config: cli.config,
        backend: cli.backend,
        ledger_path: cli.ledger_path,
    };

    let result = match cli.command {
        Commands::Check(args) => commands::check::run(args, &globals),
        Commands::Ledger { action } => commands::ledger::run(action, &globals),
        Commands::Config { action } => commands::config::run(action, &globals),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "subalert", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
