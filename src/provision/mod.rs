//! Interactive generation of SSO profiles in the AWS shared config file

pub mod profile;
pub mod selection;

pub use profile::{MergeResult, ProfileConfig, merge_profiles, profile_name};
pub use selection::{Selection, parse_selection};

use crate::api::Directory;
use crate::files::{PRIVATE_FILE_MODE, ensure_private_dir, existing_mode, write_atomic};
use crate::ui::{Prompter, print_warning};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

const ACCOUNT_QUESTION: &str =
    "Select accounts to configure (comma-separated numbers, or 'all' for all accounts)";
const ROLE_QUESTION: &str = "Select roles to configure (comma-separated numbers, or 'all' for all roles)";

/// Walks the operator through account and role selection
pub struct ProfileProvisioner<'a> {
    directory: &'a dyn Directory,
    prompter: &'a mut dyn Prompter,
    start_url: String,
    region: String,
}

impl<'a> ProfileProvisioner<'a> {
    pub fn new(
        directory: &'a dyn Directory,
        prompter: &'a mut dyn Prompter,
        start_url: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            prompter,
            start_url: start_url.into(),
            region: region.into(),
        }
    }

    /// List accounts, ask which to configure, then ask for roles per account.
    ///
    /// A failure listing any account's roles aborts the whole selection.
    pub async fn select_profiles(&mut self, access_token: &str) -> Result<Vec<ProfileConfig>> {
        let accounts = self
            .directory
            .list_accounts(access_token)
            .await
            .context("list accounts")?;

        println!("Found {} accounts from AWS SSO", accounts.len());
        println!("\nAvailable AWS accounts:");
        for (i, account) in accounts.iter().enumerate() {
            println!("[{}] {} ({})", i + 1, account.account_name, account.account_id);
        }
        println!();

        let selection = self.ask(ACCOUNT_QUESTION, accounts.len(), "account")?;
        if selection.is_empty() {
            anyhow::bail!("no valid accounts selected");
        }

        let mut profiles = Vec::new();
        for index in selection.indices {
            let account = &accounts[index];
            println!("\nProcessing account {} ({})...", account.account_name, account.account_id);

            let roles = self
                .directory
                .list_account_roles(access_token, &account.account_id)
                .await
                .with_context(|| format!("list roles for account {}", account.account_id))?;

            if roles.is_empty() {
                println!("No roles found for account {} ({})", account.account_name, account.account_id);
                continue;
            }

            println!("Available roles for {}:", account.account_name);
            for (i, role) in roles.iter().enumerate() {
                println!("[{}] {}", i + 1, role.role_name);
            }

            let role_selection = self.ask(ROLE_QUESTION, roles.len(), "role")?;
            for role_index in role_selection.indices {
                profiles.push(ProfileConfig::new(
                    account,
                    &roles[role_index],
                    &self.start_url,
                    &self.region,
                ));
            }
        }

        if profiles.is_empty() {
            anyhow::bail!("no roles selected for any accounts");
        }

        info!("Selected {} profiles", profiles.len());
        Ok(profiles)
    }

    fn ask(&mut self, question: &str, len: usize, item: &str) -> Result<Selection> {
        let answer = self.prompter.prompt(question)?;
        let selection = parse_selection(&answer, len);

        for rejected in &selection.rejected {
            warn!("Invalid {} number '{}' skipped", item, rejected);
            print_warning(&format!("Invalid {} number '{}', skipped", item, rejected));
        }

        debug!("Selected {} indices {:?}", item, selection.indices);
        Ok(selection)
    }
}

/// Read the AWS config file, creating an empty private one when it is missing
pub fn read_or_create_config(path: &Path) -> Result<String> {
    if !path.exists() {
        if let Some(dir) = path.parent() {
            ensure_private_dir(dir)?;
        }
        write_atomic(path, b"", PRIVATE_FILE_MODE)
            .with_context(|| format!("Failed to create config file: {:?}", path))?;
        info!("Created empty AWS config file at {:?}", path);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read config file: {:?}", path))
}

/// Merge `profiles` into the config file at `path` in one atomic write.
///
/// A symlinked config is written through to its target. The file is left
/// untouched when every profile is already present.
pub fn write_profiles(path: &Path, profiles: &[ProfileConfig]) -> Result<MergeResult> {
    let existing = read_or_create_config(path)?;
    let merged = merge_profiles(&existing, profiles);

    if merged.changed() {
        let target = fs::canonicalize(path)
            .with_context(|| format!("Failed to resolve config file: {:?}", path))?;
        let mode = existing_mode(&target).unwrap_or(PRIVATE_FILE_MODE);
        write_atomic(&target, merged.content.as_bytes(), mode)?;
        info!("Added {} profiles to {:?}", merged.added.len(), path);
    } else {
        info!("All {} profiles already present in {:?}", profiles.len(), path);
    }

    Ok(merged)
}
