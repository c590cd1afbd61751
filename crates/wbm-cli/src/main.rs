use clap::Parser;
use wbm_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // --debug traces to the terminal; otherwise log to the state file.
    if cli.debug {
        logging::init_logging_stderr(true);
    } else if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr(false);
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = cli.run() {
        eprintln!("wbm error: {:#}", err);
        std::process::exit(1);
    }
}
