//! MBS CLI - Command line tool for preparing Metro Bike Share chart data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "mbs-cli",
    version,
    about = "Metro Bike Share trip data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: mbs_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    mbs_cmd::run(cli.command)
}
