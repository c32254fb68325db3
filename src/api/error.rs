//! Typed errors for the SSO OIDC and portal APIs

use super::models::ErrorBody;
use thiserror::Error;

/// Error returned by a single broker or portal call
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The user has not approved the device code yet
    #[error("authorization is still pending")]
    AuthorizationPending,

    /// The client is polling too fast
    #[error("polling too frequently, slow down")]
    SlowDown,

    /// The device code expired before it was approved
    #[error("device code has expired")]
    ExpiredToken,

    /// The user denied the authorization request
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The registered client is unknown or its secret has expired
    #[error("invalid client: {0}")]
    InvalidClient(String),

    /// Any other error reported by the service
    #[error("service returned {status} {code}: {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    /// A success response that could not be parsed into a complete result
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl BrokerError {
    /// Whether the poll loop should keep going after this error
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::AuthorizationPending)
    }

    pub fn is_slow_down(&self) -> bool {
        matches!(self, Self::SlowDown)
    }

    /// Map an error response to a typed error.
    ///
    /// The OAuth `error` field wins over the `x-amzn-errortype` header, which
    /// wins over the JSON `__type` field.
    pub(crate) fn from_response(status: u16, error_type_header: Option<&str>, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let code = parsed
            .error
            .clone()
            .or_else(|| error_type_header.map(str::to_string))
            .or_else(|| parsed.error_type.clone())
            .map(|code| normalize_code(&code))
            .unwrap_or_default();

        let message = parsed
            .error_description
            .or(parsed.message)
            .unwrap_or_else(|| body.trim().to_string());

        match code.as_str() {
            "authorization_pending" | "AuthorizationPendingException" => Self::AuthorizationPending,
            "slow_down" | "SlowDownException" => Self::SlowDown,
            "expired_token" | "ExpiredTokenException" => Self::ExpiredToken,
            "access_denied" | "AccessDeniedException" => Self::AccessDenied(message),
            "invalid_client" | "InvalidClientException" => Self::InvalidClient(message),
            _ => Self::Service {
                status,
                code: if code.is_empty() { "Unknown".to_string() } else { code },
                message,
            },
        }
    }
}

/// Strip the namespace prefix and detail suffix AWS puts around error names,
/// e.g. `aws.sso#SlowDownException:http://...` becomes `SlowDownException`.
fn normalize_code(raw: &str) -> String {
    let code = raw.split(':').next().unwrap_or(raw);
    let code = code.rsplit('#').next().unwrap_or(code);
    code.trim().to_string()
}
