//! The device authorization login: register, authorize, poll

use super::browser::BrowserLauncher;
use super::poller::{PollError, TokenPoller};
use crate::api::{BrokerError, IdentityBroker};
use crate::api::constants::{CLIENT_NAME, CLIENT_TYPE};
use crate::cache::CredentialCacheEntry;
use crate::ui::display::{print_login_instructions, print_warning};
use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use std::future::Future;
use tokio_util::sync::CancellationToken;

pub struct LoginFlow<'a> {
    broker: &'a dyn IdentityBroker,
    browser: &'a dyn BrowserLauncher,
    poller: TokenPoller,
}

impl<'a> LoginFlow<'a> {
    pub fn new(
        broker: &'a dyn IdentityBroker,
        browser: &'a dyn BrowserLauncher,
        poller: TokenPoller,
    ) -> Self {
        Self { broker, browser, poller }
    }

    /// Run one login against `start_url` and return the cache entry to persist.
    ///
    /// A fresh client is registered on every call; nothing is reused between logins.
    /// `cancel` interrupts any step, including an in-flight request.
    pub async fn login(
        &self,
        region: &str,
        start_url: &str,
        cancel: &CancellationToken,
    ) -> Result<CredentialCacheEntry> {
        info!("Starting SSO login for {} in {}", start_url, region);

        let registration = cancellable(cancel, self.broker.register_client(CLIENT_NAME, CLIENT_TYPE))
            .await
            .context("register client")?;

        let authorization = cancellable(
            cancel,
            self.broker.start_device_authorization(
                &registration.client_id,
                &registration.client_secret,
                start_url,
            ),
        )
        .await
        .context("start device authorization")?;

        if let Err(e) = self.browser.open(&authorization.verification_uri_complete) {
            warn!("{:#}", e);
            print_warning(&format!("Could not open a browser: {:#}", e));
        }

        print_login_instructions(start_url, &authorization.user_code);

        let token = self
            .poller
            .poll(self.broker, &registration, &authorization, cancel)
            .await
            .context("poll for token")?;

        info!("SSO login for {} succeeded", start_url);
        Ok(CredentialCacheEntry::new(
            start_url,
            region,
            &registration,
            &token,
            Utc::now(),
        ))
    }
}

/// Await a broker call, giving up as soon as `cancel` fires
async fn cancellable<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, BrokerError>>,
) -> Result<T, PollError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PollError::Cancelled),
        result = call => result.map_err(PollError::Broker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::browser::NoBrowser;
    use crate::auth::testing::{Outcome, ScriptedBroker};
    use crate::cache::CredentialCache;
    use chrono::Duration;
    use std::sync::Mutex;

    const START_URL: &str = "https://example.awsapps.com/start/";

    #[derive(Default)]
    struct RecordingBrowser {
        opened: Mutex<Vec<String>>,
        fail: bool,
    }

    impl BrowserLauncher for RecordingBrowser {
        fn open(&self, url: &str) -> Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            if self.fail {
                anyhow::bail!("no display");
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_builds_cache_entry() {
        let broker = ScriptedBroker::new(vec![
            Outcome::Pending,
            Outcome::Pending,
            Outcome::SlowDown,
            Outcome::Token("T1"),
        ]);
        let browser = RecordingBrowser::default();
        let flow = LoginFlow::new(&broker, &browser, TokenPoller::default());

        let before = Utc::now();
        let entry = flow
            .login("ap-northeast-1", START_URL, &CancellationToken::new())
            .await
            .unwrap();
        let after = Utc::now();

        assert_eq!(entry.start_url, START_URL);
        assert_eq!(entry.region, "ap-northeast-1");
        assert_eq!(entry.access_token, "T1");
        assert_eq!(entry.client_id, "client-abcdef1234567890");
        assert_eq!(entry.registration_expires_at, "2023-11-14T22:13:20Z");

        let expires_at = entry.expires_at().unwrap();
        assert!(expires_at >= before + Duration::seconds(3600) - Duration::seconds(1));
        assert!(expires_at <= after + Duration::seconds(3600));

        assert_eq!(
            *browser.opened.lock().unwrap(),
            vec!["https://device.sso.ap-northeast-1.amazonaws.com/?user_code=ABCD-1234".to_string()]
        );

        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::new(dir.path());
        cache.purge_all().unwrap();
        let path = cache.save(&entry).unwrap();
        assert!(path.ends_with("8be3a7791abdeea628d9fbf768cc17b92db6f738.json"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_browser_failure_is_not_fatal() {
        let broker = ScriptedBroker::new(vec![Outcome::Token("T1")]);
        let browser = RecordingBrowser { fail: true, ..Default::default() };
        let flow = LoginFlow::new(&broker, &browser, TokenPoller::default());

        let entry = flow
            .login("us-east-1", START_URL, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(entry.access_token, "T1");
        assert_eq!(browser.opened.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_name_the_failing_step() {
        let broker = ScriptedBroker::failing_registration();
        let flow = LoginFlow::new(&broker, &NoBrowser, TokenPoller::default());
        let err = flow
            .login("us-east-1", START_URL, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).starts_with("register client: "));

        let broker = ScriptedBroker::new(vec![Outcome::Pending, Outcome::Denied]);
        let flow = LoginFlow::new(&broker, &NoBrowser, TokenPoller::default());
        let err = flow
            .login("us-east-1", START_URL, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).starts_with("poll for token: authorization was denied"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_login_never_registers() {
        let broker = ScriptedBroker::new(vec![Outcome::Token("T1")]);
        let flow = LoginFlow::new(&broker, &NoBrowser, TokenPoller::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = flow.login("us-east-1", START_URL, &cancel).await.unwrap_err();

        assert_eq!(format!("{:#}", err), "register client: login cancelled");
        assert_eq!(broker.registrations(), 0);
        assert!(broker.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_hanging_registration() {
        let broker = ScriptedBroker::hanging_registration();
        let flow = LoginFlow::new(&broker, &NoBrowser, TokenPoller::default());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let start = tokio::time::Instant::now();
        let err = flow.login("us-east-1", START_URL, &cancel).await.unwrap_err();

        assert_eq!(format!("{:#}", err), "register client: login cancelled");
        assert_eq!(start.elapsed(), std::time::Duration::from_secs(1));
        assert_eq!(broker.registrations(), 1);
    }
}
