//! Clients for the AWS SSO OIDC and portal APIs
//!
//! The OIDC side implements the OAuth 2.0 device authorization grant, the
//! portal side enumerates the accounts and roles an access token can reach.

pub mod client;
pub mod constants;
pub mod error;
pub mod models;
pub mod oidc;
pub mod portal;

pub use client::build_http_client;
pub use error::BrokerError;
pub use models::{Account, ClientRegistration, DeviceAuthorization, Page, Role, TokenResult};
pub use oidc::{IdentityBroker, OidcClient};
pub use portal::{Directory, PortalClient};
