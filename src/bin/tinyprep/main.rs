mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::commands::{build_synmap, prepare};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::BuildSynmap(args) => build_synmap::run(args),
        Command::Prepare(args) => prepare::run(args),
    }
}
