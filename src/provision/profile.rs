//! `[profile ...]` sections for the AWS shared config file

use crate::api::{Account, Role};
use std::collections::HashSet;

/// One SSO profile derived from an (account, role) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub name: String,
    pub start_url: String,
    pub region: String,
    pub account_id: String,
    pub role_name: String,
}

impl ProfileConfig {
    pub fn new(account: &Account, role: &Role, start_url: &str, region: &str) -> Self {
        Self {
            name: profile_name(&account.account_name, &role.role_name),
            start_url: start_url.to_string(),
            region: region.to_string(),
            account_id: account.account_id.clone(),
            role_name: role.role_name.clone(),
        }
    }

    pub fn header(&self) -> String {
        format!("[profile {}]", self.name)
    }

    /// The section text, ending with a newline
    pub fn render(&self) -> String {
        format!(
            "{}\nsso_start_url = {}\nsso_region = {}\nsso_account_id = {}\n\
             sso_role_name = {}\nregion = {}\n",
            self.header(),
            self.start_url,
            self.region,
            self.account_id,
            self.role_name,
            self.region,
        )
    }
}

/// `Prod Account` + `AdminRole` becomes `prod-account-adminrole`
pub fn profile_name(account_name: &str, role_name: &str) -> String {
    format!("{}-{}", account_name, role_name)
        .replace(' ', "-")
        .to_lowercase()
}

/// Outcome of merging profiles into existing config text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub content: String,
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

impl MergeResult {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Append every profile whose header does not already appear in `existing`.
///
/// Existing text is kept as is apart from trailing whitespace; sections are
/// separated by one blank line. Profiles repeated within `profiles` are added once.
pub fn merge_profiles(existing: &str, profiles: &[ProfileConfig]) -> MergeResult {
    let mut batch: HashSet<String> = HashSet::new();

    let mut added = Vec::new();
    let mut skipped = Vec::new();
    let mut content = existing.trim_end().to_string();
    if !content.is_empty() {
        content.push('\n');
    }

    for profile in profiles {
        let header = profile.header();
        if existing.contains(&header) || !batch.insert(header) {
            skipped.push(profile.name.clone());
            continue;
        }

        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(&profile.render());
        added.push(profile.name.clone());
    }

    if added.is_empty() {
        content = existing.to_string();
    }

    MergeResult { content, added, skipped }
}
