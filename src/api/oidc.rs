//! SSO OIDC client: client registration, device authorization and token exchange

use super::client::read_json;
use super::constants::{oidc_endpoint, paths};
use super::error::BrokerError;
use super::models::{
    ClientRegistration, CreateTokenRequest, DeviceAuthorization, RegisterClientRequest,
    StartDeviceAuthorizationRequest, TokenResult,
};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

/// The three device authorization grant operations of the identity broker
#[async_trait]
pub trait IdentityBroker: Send + Sync {
    async fn register_client(
        &self,
        client_name: &str,
        client_type: &str,
    ) -> Result<ClientRegistration, BrokerError>;

    async fn start_device_authorization(
        &self,
        client_id: &str,
        client_secret: &str,
        start_url: &str,
    ) -> Result<DeviceAuthorization, BrokerError>;

    async fn create_token(
        &self,
        client_id: &str,
        client_secret: &str,
        device_code: &str,
        grant_type: &str,
    ) -> Result<TokenResult, BrokerError>;
}

/// HTTP implementation of [`IdentityBroker`] against the SSO OIDC REST API
#[derive(Debug, Clone)]
pub struct OidcClient {
    http: Client,
    endpoint: String,
}

impl OidcClient {
    /// Client for the regional OIDC endpoint
    pub fn new(http: Client, region: &str) -> Self {
        Self::with_endpoint(http, oidc_endpoint(region))
    }

    /// Client for an explicit endpoint (private link, tests)
    pub fn with_endpoint(http: Client, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

#[async_trait]
impl IdentityBroker for OidcClient {
    async fn register_client(
        &self,
        client_name: &str,
        client_type: &str,
    ) -> Result<ClientRegistration, BrokerError> {
        debug!("Registering {} client '{}'", client_type, client_name);

        let response = self
            .http
            .post(self.url(paths::REGISTER_CLIENT))
            .json(&RegisterClientRequest { client_name, client_type })
            .send()
            .await?;

        read_json(response).await
    }

    async fn start_device_authorization(
        &self,
        client_id: &str,
        client_secret: &str,
        start_url: &str,
    ) -> Result<DeviceAuthorization, BrokerError> {
        debug!("Starting device authorization for {}", start_url);

        let response = self
            .http
            .post(self.url(paths::DEVICE_AUTHORIZATION))
            .json(&StartDeviceAuthorizationRequest {
                client_id,
                client_secret,
                start_url,
            })
            .send()
            .await?;

        read_json(response).await
    }

    async fn create_token(
        &self,
        client_id: &str,
        client_secret: &str,
        device_code: &str,
        grant_type: &str,
    ) -> Result<TokenResult, BrokerError> {
        let response = self
            .http
            .post(self.url(paths::TOKEN))
            .json(&CreateTokenRequest {
                client_id,
                client_secret,
                device_code,
                grant_type,
            })
            .send()
            .await?;

        read_json(response).await
    }
}
