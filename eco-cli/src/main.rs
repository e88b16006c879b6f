//! EcoFish CLI - batch tools for lake monitoring snapshot files.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "eco-cli",
    version,
    about = "EcoFish lake water-quality snapshot toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: eco_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[Eco Debug] cli: starting");
    eco_cmd::run(cli.command).await
}
