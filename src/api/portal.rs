//! SSO portal client: account and role enumeration for a bearer token

use super::client::read_json;
use super::constants::{PORTAL_PAGE_SIZE, SSO_BEARER_HEADER, paths, portal_endpoint};
use super::error::BrokerError;
use super::models::{Account, ListAccountRolesResponse, ListAccountsResponse, Page, Role};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

/// Account and role directory reachable with an SSO access token
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetch a single page of accounts
    async fn list_accounts_page(
        &self,
        access_token: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Account>, BrokerError>;

    /// Roles for one account (first page only)
    async fn list_account_roles(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<Vec<Role>, BrokerError>;

    /// Every account, following continuation tokens until the last page
    async fn list_accounts(&self, access_token: &str) -> Result<Vec<Account>, BrokerError> {
        let mut accounts = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .list_accounts_page(access_token, next_token.as_deref())
                .await?;
            accounts.extend(page.items);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        debug!("Listed {} accounts", accounts.len());
        Ok(accounts)
    }
}

/// HTTP implementation of [`Directory`] against the SSO portal API
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: Client,
    endpoint: String,
}

impl PortalClient {
    pub fn new(http: Client, region: &str) -> Self {
        Self::with_endpoint(http, portal_endpoint(region))
    }

    pub fn with_endpoint(http: Client, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { http, endpoint }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

#[async_trait]
impl Directory for PortalClient {
    async fn list_accounts_page(
        &self,
        access_token: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Account>, BrokerError> {
        let mut query = vec![("max_result", PORTAL_PAGE_SIZE.to_string())];
        if let Some(token) = next_token {
            query.push(("next_token", token.to_string()));
        }

        let response = self
            .http
            .get(self.url(paths::LIST_ACCOUNTS))
            .header(SSO_BEARER_HEADER, access_token)
            .query(&query)
            .send()
            .await?;

        let body: ListAccountsResponse = read_json(response).await?;
        Ok(Page {
            items: body.account_list,
            next_token: body.next_token,
        })
    }

    async fn list_account_roles(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<Vec<Role>, BrokerError> {
        let response = self
            .http
            .get(self.url(paths::LIST_ACCOUNT_ROLES))
            .header(SSO_BEARER_HEADER, access_token)
            .query(&[
                ("account_id", account_id.to_string()),
                ("max_result", PORTAL_PAGE_SIZE.to_string()),
            ])
            .send()
            .await?;

        let body: ListAccountRolesResponse = read_json(response).await?;
        if body.next_token.is_some() {
            debug!("Account {} has more roles than one page, using the first page", account_id);
        }
        Ok(body.role_list)
    }
}
