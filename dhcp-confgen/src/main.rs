use anyhow::Result;
use clap::Parser;

mod cli;
mod expand_cmd;
mod generate_cmd;
mod subnets_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Expand(args) => expand_cmd::run_expand(args),
        Command::Subnets(args) => subnets_cmd::run_subnets(args),
        Command::Generate(args) => generate_cmd::run_generate(args),
    }
}
