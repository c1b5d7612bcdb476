use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use tracing::info;

use lockchart::{Chart, Config, Fork, Mechanism, Party, ProbeProcess, Verbosity, logging, sweep};

/// Chart how a filesystem resolves file locks held by two processes.
#[derive(Debug, Parser)]
#[command(name = "lockchart", version)]
struct Cli {
    /// Use the resource fork instead of the data fork (macOS only)
    #[arg(short = 'r', long)]
    resource_fork: bool,

    /// -v prints failing operations and each cell, -vv every operation
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Lock mechanism of the first open
    #[arg(long, value_enum, default_value_t = Mechanism::OpenTimeReservation)]
    first: Mechanism,

    /// Lock mechanism of the second open
    #[arg(long, value_enum, default_value_t = Mechanism::OpenTimeReservation)]
    second: Mechanism,

    /// lock_probe executable (default: next to this binary)
    #[arg(long, value_name = "EXE")]
    probe: Option<PathBuf>,

    path1: PathBuf,
    path2: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let fork = if cli.resource_fork {
        Fork::Resource
    } else {
        Fork::Data
    };
    if !fork.is_supported() {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "resource forks are only reachable on macOS",
            )
            .exit();
    }

    let config = Config::new(Verbosity::new(cli.verbose), cli.probe)?;
    logging::init(config.verbosity);

    let first = Party::new(fork.apply(&cli.path1), cli.first);
    let second = Party::new(fork.apply(&cli.path2), cli.second);
    if config.verbosity >= Verbosity::FAILURES {
        info!(
            "{:<32} {:<32}",
            first.path.display().to_string(),
            second.path.display().to_string()
        );
    }

    let probe = ProbeProcess::new(&config);
    let grid = sweep(&first, &second, &probe).context("lock sweep aborted")?;
    print!("{}", Chart::new(&grid, cli.first, cli.second));
    Ok(())
}
