use crate::cache::CredentialCache;
use crate::ui::display::device_url;
use anyhow::Result;
use chrono::Utc;
use colored::*;

/// Show whether a cached token exists for `start_url` and when it expires
pub fn status_command(cache: &CredentialCache, start_url: &str) -> Result<()> {
    println!("SSO Login Status");
    println!("================");
    println!("Start URL: {}", start_url);

    let Some(entry) = cache.load(start_url)? else {
        println!("  {}", "○ Not logged in".bright_yellow());
        println!("  {}", "Run 'sso-cli sso login' to sign in.".dimmed());
        return Ok(());
    };

    println!("Region:    {}", entry.region);
    println!("Cache:     {:?}", cache.path_for(start_url));

    let now = Utc::now();
    if entry.is_expired(now) {
        println!("  {} Token expired at {}", "○".bright_red(), entry.expires_at);
        println!("  {}", format!("Sign in again at {}", device_url(start_url)).dimmed());
    } else {
        let minutes = entry
            .expires_at()
            .map(|expires_at| (expires_at - now).num_minutes())
            .unwrap_or_default();
        println!(
            "  {} Logged in, token expires at {} ({} minutes left)",
            "●".bright_green(),
            entry.expires_at,
            minutes
        );
    }

    Ok(())
}
