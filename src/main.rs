use anyhow::Result;
use clap::Parser;
use log::info;

use sso_cli::cli::Cli;
use sso_cli::cli::app::Commands;
use sso_cli::cli::commands::sso_command;
use sso_cli::config::Config;
use sso_cli::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;
    info!("Starting sso-cli");

    let config = Config::load()?;

    match cli.command {
        Commands::Sso(args) => sso_command(args, &config).await,
    }
}
