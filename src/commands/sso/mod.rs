mod generate_config;
mod interrupt;
mod login;
mod logout;
mod status;

pub use generate_config::{
    GenerateConfigOptions, SelectionPrompter, generate_config_command, generate_config_with,
};
pub use interrupt::{Interrupt, interruptible};
pub use login::login_command;
pub use logout::logout_command;
pub use status::status_command;

use crate::api::{OidcClient, PortalClient, build_http_client};
use crate::auth::{BrowserLauncher, PollerConfig, browser};
use crate::cache::CredentialCache;
use crate::config::{AwsPaths, Config};
use anyhow::Result;
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a login or profile generation run needs, resolved up front
pub struct SsoContext {
    pub region: String,
    pub start_url: String,
    pub broker: OidcClient,
    pub directory: PortalClient,
    pub browser: Box<dyn BrowserLauncher>,
    pub cache: CredentialCache,
    pub aws_config_file: PathBuf,
    pub poller: PollerConfig,
    pub timeout: Duration,
}

impl SsoContext {
    pub fn from_config(
        config: &Config,
        region: String,
        start_url: String,
        open_browser: bool,
    ) -> Result<Self> {
        let http = build_http_client()?;
        let paths = AwsPaths::from_home()?;

        let broker = match &config.oidc_endpoint {
            Some(endpoint) => OidcClient::with_endpoint(http.clone(), endpoint.as_str()),
            None => OidcClient::new(http.clone(), &region),
        };
        debug!("Using OIDC endpoint {}", broker.endpoint());

        let directory = match &config.portal_endpoint {
            Some(endpoint) => PortalClient::with_endpoint(http, endpoint.as_str()),
            None => PortalClient::new(http, &region),
        };

        Ok(Self {
            region,
            start_url,
            broker,
            directory,
            browser: browser::launcher(open_browser && config.open_browser),
            cache: CredentialCache::new(paths.sso_cache_dir),
            aws_config_file: paths.config_file,
            poller: config.poll.poller_config(),
            timeout: config.timeout(),
        })
    }
}
