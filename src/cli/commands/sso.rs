use crate::commands::sso::{
    GenerateConfigOptions, SsoContext, generate_config_command, login_command, logout_command,
    status_command,
};
use crate::cache::CredentialCache;
use crate::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct SsoCommands {
    #[command(subcommand)]
    pub command: SsoSubcommands,
}

/// Region and access portal of the SSO instance
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// AWS region of the SSO instance (default ap-northeast-1)
    #[arg(short, long)]
    pub region: Option<String>,
    /// AWS access portal, e.g. `my-org` for https://my-org.awsapps.com/start/
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum SsoSubcommands {
    /// Login to SSO
    Login {
        #[command(flatten)]
        target: TargetArgs,
        /// Don't open the verification page in a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Logout from SSO. Remove all cache files.
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate `~/.aws/config` profiles for the accounts and roles available through SSO
    GenerateConfig {
        #[command(flatten)]
        target: TargetArgs,
        /// Don't open the verification page in a browser
        #[arg(long)]
        no_browser: bool,
        /// Accounts to configure without prompting, e.g. `1,3` or `all`
        #[arg(long)]
        accounts: Option<String>,
        /// Roles to configure for every selected account, e.g. `1` or `all`
        #[arg(long)]
        roles: Option<String>,
    },
    /// Show the cached login for an access portal
    Status {
        #[command(flatten)]
        target: TargetArgs,
    },
}

pub async fn sso_command(args: SsoCommands, config: &Config) -> Result<()> {
    match args.command {
        SsoSubcommands::Login { target, no_browser } => {
            let ctx = context(config, target, no_browser)?;
            login_command(&ctx).await?;
        }
        SsoSubcommands::Logout { force } => {
            let cache = CredentialCache::default_location()?;
            logout_command(&cache, force)?;
        }
        SsoSubcommands::GenerateConfig {
            target,
            no_browser,
            accounts,
            roles,
        } => {
            let ctx = context(config, target, no_browser)?;
            generate_config_command(&ctx, GenerateConfigOptions { accounts, roles }).await?;
        }
        SsoSubcommands::Status { target } => {
            let start_url = config.resolve_start_url(target.url)?;
            let cache = CredentialCache::default_location()?;
            status_command(&cache, &start_url)?;
        }
    }
    Ok(())
}

fn context(config: &Config, target: TargetArgs, no_browser: bool) -> Result<SsoContext> {
    let region = config.resolve_region(target.region);
    let start_url = config.resolve_start_url(target.url)?;
    SsoContext::from_config(config, region, start_url, !no_browser)
}
