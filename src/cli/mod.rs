use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::Builder as LoggerBuilder;
use log::{LevelFilter, debug};
use std::{
    env,
    io::{self, Write},
    path::PathBuf,
};

use crate::config;
use crate::storage::{error::StorageError, gateway::PersistenceGateway};

pub mod menu;

#[derive(Parser)]
#[command(name = "cdinventory")]
#[command(version = "0.1")]
#[command(about = "Interactive CD inventory")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Inventory file, overrides the one from the config
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// More log output, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive menu (default)
    Menu,
    /// Print the saved inventory
    List,
}

fn init_env_logger(level_filter: LevelFilter) {
    let mut logger_builder = LoggerBuilder::new();
    logger_builder.filter(None, level_filter);

    if let Ok(rust_log) = env::var("RUST_LOG") {
        logger_builder.parse_filters(&rust_log);
    }

    logger_builder.init();
}

fn level_filter_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_env_logger(level_filter_for_verbosity(cli.verbose));

    let cfg = config::Config::load_or_default(cli.config.as_deref())?;
    let path = cli.file.unwrap_or(cfg.inventory.path);
    debug!("using inventory file {}", path.display());
    let gateway = PersistenceGateway::new(&path);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            let mut session = menu::Session::new(gateway, stdin.lock(), io::stdout());
            session.run().with_context(|| "terminal input/output failed")?;
        }

        Commands::List => {
            let mut stdout = io::stdout().lock();
            list(&gateway, &mut stdout)?;
        }
    }

    Ok(())
}

/// prints the saved inventory, a missing file counts as an empty one
fn list<W: Write>(gateway: &PersistenceGateway, out: &mut W) -> anyhow::Result<()> {
    let records = match gateway.load() {
        Ok(records) => records,
        Err(StorageError::FileNotFound { .. }) => vec![],
        Err(e) => return Err(e).with_context(|| "Failed to load inventory"),
    };
    menu::write_inventory(out, &records)?;
    out.flush()?;
    Ok(())
}
