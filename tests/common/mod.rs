//! Shared wiremock fixtures for the SSO integration tests

#![allow(dead_code)]

use serde_json::json;
use sso_cli::api::{OidcClient, PortalClient, build_http_client};
use sso_cli::auth::PollerConfig;
use sso_cli::auth::browser::NoBrowser;
use sso_cli::cache::CredentialCache;
use sso_cli::commands::sso::SsoContext;
use sso_cli::config::AwsPaths;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const START_URL: &str = "https://example.awsapps.com/start/";
pub const REGION: &str = "us-east-1";
pub const ACCESS_TOKEN: &str = "T1";

/// Context pointing both clients at `server` and every file under `home`
pub fn context(server: &MockServer, home: &TempDir) -> SsoContext {
    let http = build_http_client().expect("http client");
    let paths = AwsPaths::under(home.path());

    SsoContext {
        region: REGION.to_string(),
        start_url: START_URL.to_string(),
        broker: OidcClient::with_endpoint(http.clone(), server.uri()),
        directory: PortalClient::with_endpoint(http, server.uri()),
        browser: Box::new(NoBrowser),
        cache: CredentialCache::new(paths.sso_cache_dir),
        aws_config_file: paths.config_file,
        poller: PollerConfig {
            max_attempts: 10,
            default_interval: Duration::from_millis(50),
        },
        timeout: Duration::from_secs(30),
    }
}

/// Register the client and start a device authorization without a broker interval
pub async fn mount_device_authorization(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/client/register"))
        .and(body_partial_json(json!({ "clientName": "sso-cli", "clientType": "public" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientId": "C1",
            "clientSecret": "S1",
            "clientIdIssuedAt": 1_700_000_000,
            "clientSecretExpiresAt": 1_900_000_000
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/device_authorization"))
        .and(body_partial_json(json!({
            "clientId": "C1",
            "clientSecret": "S1",
            "startUrl": START_URL
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deviceCode": "D1",
            "userCode": "ABCD-1234",
            "verificationUri": "https://device.sso.us-east-1.amazonaws.com/",
            "verificationUriComplete":
                "https://device.sso.us-east-1.amazonaws.com/?user_code=ABCD-1234",
            "expiresIn": 600
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// OAuth error response as the OIDC service sends it
pub fn oauth_error(code: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error": code,
        "error_description": format!("{} (test)", code)
    }))
}

pub fn token_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "accessToken": ACCESS_TOKEN,
        "tokenType": "Bearer",
        "expiresIn": 3600
    }))
}

/// Answers the token endpoint from a script, repeating the last entry once it runs out
pub struct TokenScript {
    responses: Vec<ResponseTemplate>,
    calls: Arc<AtomicUsize>,
}

impl TokenScript {
    pub fn new(responses: Vec<ResponseTemplate>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let script = Self {
            responses,
            calls: calls.clone(),
        };
        (script, calls)
    }

    pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl Respond for TokenScript {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = n.min(self.responses.len() - 1);
        self.responses[index].clone()
    }
}

/// Token endpoint answering with `responses` in order
pub async fn mount_token_script(
    server: &MockServer,
    responses: Vec<ResponseTemplate>,
) -> Arc<AtomicUsize> {
    let (script, calls) = TokenScript::new(responses);
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_partial_json(json!({
            "clientId": "C1",
            "clientSecret": "S1",
            "deviceCode": "D1",
            "grantType": "urn:ietf:params:oauth:grant-type:device_code"
        })))
        .respond_with(script)
        .mount(server)
        .await;
    calls
}
