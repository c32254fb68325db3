//! Endpoints and protocol constants for the AWS SSO OIDC and portal APIs

/// Client name sent when registering a public OIDC client
pub const CLIENT_NAME: &str = "sso-cli";

/// Client type sent when registering a public OIDC client
pub const CLIENT_TYPE: &str = "public";

/// OAuth 2.0 device authorization grant type
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Header carrying the bearer token on portal requests
pub const SSO_BEARER_HEADER: &str = "x-amz-sso_bearer_token";

/// Header carrying the modeled error name on AWS JSON error responses
pub const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Page size requested from the portal list operations
pub const PORTAL_PAGE_SIZE: u32 = 100;

/// User agent for every outgoing request
pub const USER_AGENT: &str = concat!("sso-cli/", env!("CARGO_PKG_VERSION"));

/// OIDC API paths
pub mod paths {
    pub const REGISTER_CLIENT: &str = "/client/register";
    pub const DEVICE_AUTHORIZATION: &str = "/device_authorization";
    pub const TOKEN: &str = "/token";
    pub const LIST_ACCOUNTS: &str = "/assignment/accounts";
    pub const LIST_ACCOUNT_ROLES: &str = "/assignment/roles";
}

/// Regional SSO OIDC endpoint
pub fn oidc_endpoint(region: &str) -> String {
    format!("https://oidc.{}.amazonaws.com", region)
}

/// Regional SSO portal endpoint
pub fn portal_endpoint(region: &str) -> String {
    format!("https://portal.sso.{}.amazonaws.com", region)
}

/// Build the access portal URL from a start-url host fragment.
///
/// Values that are already full `https://` URLs are used as given.
pub fn start_url(host: &str) -> String {
    let host = host.trim();
    if host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}.awsapps.com/start/", host)
    }
}
