use anyhow::{Context, Result};
use log::debug;

/// Opens the verification page for the operator
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// The platform's default browser (`xdg-open`, `open` or `start`)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        debug!("Opening {} in the default browser", url);
        open::that(url).with_context(|| format!("Failed to open browser for {}", url))
    }
}

/// Used with `--no-browser`; the printed URL is the only path
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBrowser;

impl BrowserLauncher for NoBrowser {
    fn open(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}

pub fn launcher(open_browser: bool) -> Box<dyn BrowserLauncher> {
    if open_browser {
        Box::new(SystemBrowser)
    } else {
        Box::new(NoBrowser)
    }
}
