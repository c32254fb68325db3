use crate::cache::CredentialCache;
use crate::ui::{print_success, prompt_confirmation};
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;

/// Remove every cached SSO token, for every start URL
pub fn logout_command(cache: &CredentialCache, force: bool) -> Result<usize> {
    info!("Purging SSO cache at {:?}", cache.dir());

    if !force && std::io::stdin().is_terminal() {
        let confirmed = prompt_confirmation(
            "Remove all cached SSO tokens? This signs out of every SSO profile",
            true,
        )?;
        if !confirmed {
            println!("Logout cancelled.");
            return Ok(0);
        }
    }

    let removed = cache.purge_all().context("purge credential cache")?;
    print_success("Successfully signed out of all SSO profiles.");
    Ok(removed)
}
