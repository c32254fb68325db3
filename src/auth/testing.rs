//! In-memory identity broker for exercising the login flow without a network

use crate::api::{BrokerError, ClientRegistration, DeviceAuthorization, IdentityBroker, TokenResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::Instant;

/// Scripted response to one `CreateToken` call
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Pending,
    SlowDown,
    Expired,
    Denied,
    InvalidClient,
    Token(&'static str),
}

impl Outcome {
    fn into_result(self) -> Result<TokenResult, BrokerError> {
        match self {
            Outcome::Pending => Err(BrokerError::AuthorizationPending),
            Outcome::SlowDown => Err(BrokerError::SlowDown),
            Outcome::Expired => Err(BrokerError::ExpiredToken),
            Outcome::Denied => Err(BrokerError::AccessDenied("denied by user".to_string())),
            Outcome::InvalidClient => Err(BrokerError::InvalidClient("unknown client".to_string())),
            Outcome::Token(access_token) => Ok(TokenResult {
                access_token: access_token.to_string(),
                refresh_token: None,
                id_token: None,
                token_type: "Bearer".to_string(),
                expires_in: 3600,
            }),
        }
    }
}

pub fn registration() -> ClientRegistration {
    ClientRegistration {
        client_id: "client-abcdef1234567890".to_string(),
        client_secret: "client-secret-abcdef1234567890".to_string(),
        client_secret_expires_at: 1_700_000_000,
    }
}

pub fn device_authorization(interval: Option<u64>) -> DeviceAuthorization {
    DeviceAuthorization {
        device_code: "D1".to_string(),
        user_code: "ABCD-1234".to_string(),
        verification_uri: "https://device.sso.ap-northeast-1.amazonaws.com/".to_string(),
        verification_uri_complete: "https://device.sso.ap-northeast-1.amazonaws.com/?user_code=ABCD-1234"
            .to_string(),
        expires_in: 600,
        interval,
    }
}

pub struct ScriptedBroker {
    outcomes: Mutex<VecDeque<Outcome>>,
    repeat: Option<Outcome>,
    fail_register: bool,
    hang_register: bool,
    registrations: AtomicUsize,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedBroker {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            repeat: None,
            fail_register: false,
            hang_register: false,
            registrations: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn repeating(outcome: Outcome) -> Self {
        Self {
            repeat: Some(outcome),
            ..Self::new(Vec::new())
        }
    }

    pub fn failing_registration() -> Self {
        Self {
            fail_register: true,
            ..Self::new(Vec::new())
        }
    }

    /// Registration never answers
    pub fn hanging_registration() -> Self {
        Self {
            hang_register: true,
            ..Self::new(Vec::new())
        }
    }

    /// Number of `RegisterClient` calls that started
    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    /// When each `CreateToken` call happened
    pub fn calls(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityBroker for ScriptedBroker {
    async fn register_client(
        &self,
        _client_name: &str,
        _client_type: &str,
    ) -> Result<ClientRegistration, BrokerError> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        if self.hang_register {
            std::future::pending::<()>().await;
        }
        if self.fail_register {
            return Err(BrokerError::Service {
                status: 500,
                code: "InternalServerException".to_string(),
                message: "try again later".to_string(),
            });
        }
        Ok(registration())
    }

    async fn start_device_authorization(
        &self,
        _client_id: &str,
        _client_secret: &str,
        _start_url: &str,
    ) -> Result<DeviceAuthorization, BrokerError> {
        Ok(device_authorization(Some(1)))
    }

    async fn create_token(
        &self,
        _client_id: &str,
        _client_secret: &str,
        device_code: &str,
        _grant_type: &str,
    ) -> Result<TokenResult, BrokerError> {
        assert_eq!(device_code, "D1");
        self.calls.lock().unwrap().push(Instant::now());

        let next = self.outcomes.lock().unwrap().pop_front().or(self.repeat);
        next.expect("scripted broker ran out of outcomes").into_result()
    }
}
