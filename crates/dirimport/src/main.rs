use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = dirimport::cli::Cli::parse();
    dirimport::cli::run(cli)
}
