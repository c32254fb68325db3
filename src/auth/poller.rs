//! Device authorization polling loop

use crate::api::{BrokerError, ClientRegistration, DeviceAuthorization, IdentityBroker, TokenResult};
use crate::api::constants::DEVICE_CODE_GRANT_TYPE;
use log::{debug, info, warn};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Default number of `CreateToken` calls before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Interval used when the broker does not suggest one
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Terminal outcomes of a poll other than success
#[derive(Debug, Error)]
pub enum PollError {
    #[error("login cancelled")]
    Cancelled,

    #[error("timed out waiting for authorization after {attempts} attempts")]
    TimedOut { attempts: u32 },

    #[error("device code expired before the request was approved")]
    Expired,

    #[error("authorization was denied: {0}")]
    Denied(String),

    #[error(transparent)]
    Broker(BrokerError),
}

#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    pub max_attempts: u32,
    pub default_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            default_interval: DEFAULT_INTERVAL,
        }
    }
}

/// Per-login poll state. Only ever grows its interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollState {
    interval: Duration,
    attempts: u32,
}

impl PollState {
    pub fn new(interval: Duration) -> Self {
        Self { interval, attempts: 0 }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Double the interval after a rate-limit response
    pub fn slow_down(&mut self) {
        self.interval = self.interval.saturating_mul(2);
    }
}

/// Exchanges an approved device code for a token
#[derive(Debug, Clone, Default)]
pub struct TokenPoller {
    config: PollerConfig,
}

impl TokenPoller {
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Initial state for a new login
    pub fn initial_state(&self, authorization: &DeviceAuthorization) -> PollState {
        PollState::new(
            authorization
                .poll_interval()
                .unwrap_or(self.config.default_interval),
        )
    }

    /// Poll until the broker issues a token, reports a terminal error, the
    /// attempt budget runs out, or `cancel` fires.
    pub async fn poll<B>(
        &self,
        broker: &B,
        registration: &ClientRegistration,
        authorization: &DeviceAuthorization,
        cancel: &CancellationToken,
    ) -> Result<TokenResult, PollError>
    where
        B: IdentityBroker + ?Sized,
    {
        let mut state = self.initial_state(authorization);
        let max_attempts = self.config.max_attempts.max(1);
        debug!("Polling for token every {:?}, at most {} attempts", state.interval(), max_attempts);

        loop {
            state.record_attempt();

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                result = broker.create_token(
                    &registration.client_id,
                    &registration.client_secret,
                    &authorization.device_code,
                    DEVICE_CODE_GRANT_TYPE,
                ) => result,
            };

            match result {
                Ok(token) => {
                    info!("Token issued after {} attempts", state.attempts());
                    return Ok(token);
                }
                Err(e) if e.is_pending() => {
                    debug!("Attempt {}: authorization pending", state.attempts());
                }
                Err(e) if e.is_slow_down() => {
                    state.slow_down();
                    warn!(
                        "Attempt {}: rate limited, interval now {:?}",
                        state.attempts(),
                        state.interval()
                    );
                }
                Err(BrokerError::ExpiredToken) => return Err(PollError::Expired),
                Err(BrokerError::AccessDenied(message)) => return Err(PollError::Denied(message)),
                Err(e) => return Err(PollError::Broker(e)),
            }

            if state.attempts() >= max_attempts {
                return Err(PollError::TimedOut { attempts: state.attempts() });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = tokio::time::sleep(state.interval()) => {}
            }
        }
    }
}
