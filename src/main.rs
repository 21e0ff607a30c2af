use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod candidates;
mod cli;
mod compare;
mod normalize;
mod output;
mod synonyms;
mod util;
mod workflow;

use cli::{Command, RootArgs};

const LOG_ENV_VAR: &str = "SMATCH_LOG";

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Normalize(args) => workflow::run_normalize(args),
        Command::Compare(args) => workflow::run_compare(args),
        Command::Config(args) => workflow::run_config(args),
    }
}
