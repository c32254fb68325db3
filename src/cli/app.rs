use super::commands::SsoCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sso-cli")]
#[command(version, about = "A CLI tool for AWS SSO login and profile generation")]
pub struct Cli {
    /// Log at debug level (see sso-cli.log in the config directory)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage SSO
    Sso(SsoCommands),
}
