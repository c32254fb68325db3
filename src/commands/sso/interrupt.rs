use crate::ui::print_warning;
use anyhow::Result;
use log::warn;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Exit status after a second Ctrl-C
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Ctrl-C handling for one command.
///
/// The first Ctrl-C cancels the token, so whatever request or wait is in
/// progress stops at its next await. A second Ctrl-C exits the process, which
/// also covers a blocking terminal prompt.
pub struct Interrupt {
    cancel: CancellationToken,
    watcher: JoinHandle<()>,
}

impl Interrupt {
    pub fn watch() -> Self {
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn(watch_ctrl_c(cancel.clone()));
        Self { cancel, watcher }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Drop for Interrupt {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

async fn watch_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    warn!("Interrupted, cancelling");
    print_warning("Interrupted, stopping. Press Ctrl-C again to exit immediately.");
    cancel.cancel();

    if tokio::signal::ctrl_c().await.is_ok() {
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
}

/// Run `step` unless `cancel` fires first
pub async fn interruptible<T>(
    cancel: &CancellationToken,
    step: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => anyhow::bail!("interrupted"),
        result = step => result,
    }
}
