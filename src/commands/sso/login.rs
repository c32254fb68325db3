use super::SsoContext;
use super::interrupt::Interrupt;
use crate::auth::{LoginFlow, TokenPoller};
use crate::cache::CredentialCacheEntry;
use crate::ui::print_success;
use anyhow::{Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

/// Log in, write the cache entry, and return it
pub async fn login_command(ctx: &SsoContext) -> Result<CredentialCacheEntry> {
    let interrupt = Interrupt::watch();
    let entry = login_and_cache(ctx, interrupt.token()).await?;

    // Same output as aws sso login
    print_success(&format!("Successfully logged into Start URL: {}", ctx.start_url));
    Ok(entry)
}

pub(super) async fn login_and_cache(
    ctx: &SsoContext,
    cancel: &CancellationToken,
) -> Result<CredentialCacheEntry> {
    let flow = LoginFlow::new(&ctx.broker, ctx.browser.as_ref(), TokenPoller::new(ctx.poller));

    let login = flow.login(&ctx.region, &ctx.start_url, cancel);
    let entry = match tokio::time::timeout(ctx.timeout, login).await {
        Ok(result) => result?,
        Err(_) => anyhow::bail!("login: timed out after {:?}", ctx.timeout),
    };

    let path = ctx.cache.save(&entry).context("write credential cache")?;
    info!("Credential cache written to {:?}", path);
    Ok(entry)
}
