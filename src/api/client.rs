use super::constants::{ERROR_TYPE_HEADER, USER_AGENT};
use super::error::BrokerError;
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the HTTP client shared by the OIDC and portal clients
pub fn build_http_client() -> Result<reqwest::Client, BrokerError> {
    let client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Decode a JSON success body, or map an error response to a [`BrokerError`]
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BrokerError> {
    let status = response.status();
    debug!("{} {}", status.as_u16(), response.url().path());

    if status.is_success() {
        let body = response.text().await?;
        return serde_json::from_str(&body).map_err(|e| BrokerError::MalformedResponse(e.to_string()));
    }

    let error_type = response
        .headers()
        .get(ERROR_TYPE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response.text().await?;

    Err(BrokerError::from_response(status.as_u16(), error_type.as_deref(), &body))
}
