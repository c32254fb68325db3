pub mod browser;
pub mod flow;
pub mod poller;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::{BrowserLauncher, NoBrowser, SystemBrowser};
pub use flow::LoginFlow;
pub use poller::{PollError, PollState, PollerConfig, TokenPoller};
