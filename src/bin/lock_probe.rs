use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::info_span;

use lockchart::{AccessIntent, Disposition, Mechanism, Request, Verbosity, logging};

/// Opens and locks one file without blocking. Exits 0 if both steps
/// succeeded, 1 if either was refused.
#[derive(Debug, Parser)]
#[command(name = "lock_probe")]
struct Args {
    #[arg(long, value_enum)]
    intent: AccessIntent,

    #[arg(long, value_enum)]
    lock: Disposition,

    #[arg(long, value_enum)]
    mechanism: Mechanism,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    path: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(Verbosity::new(args.verbose));

    let request = Request::new(args.path, args.intent, args.lock, args.mechanism);
    let _inner = info_span!("inner").entered();
    // The lock lives until exit; the holder only wants to know it was granted.
    match request.acquire() {
        Some(_held) => ExitCode::SUCCESS,
        None => ExitCode::FAILURE,
    }
}
