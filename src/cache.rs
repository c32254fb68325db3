//! SSO token cache shared with the AWS CLI
//!
//! Entries live in `~/.aws/sso/cache/<sha1(startUrl)>.json`. The file name,
//! JSON field names and timestamp format are read by the AWS CLI and SDKs, so
//! they must not change.

use crate::api::{ClientRegistration, TokenResult};
use crate::files::{PRIVATE_FILE_MODE, ensure_private_dir, write_atomic};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};

/// One cached SSO login, keyed by start URL
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCacheEntry {
    pub start_url: String,
    pub region: String,
    pub access_token: String,
    /// RFC3339, UTC
    pub expires_at: String,
    pub client_id: String,
    pub client_secret: String,
    /// RFC3339, UTC
    pub registration_expires_at: String,
}

impl CredentialCacheEntry {
    /// Build the entry for a token issued at `issued_at`
    pub fn new(
        start_url: &str,
        region: &str,
        registration: &ClientRegistration,
        token: &TokenResult,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expires_in = i64::try_from(token.expires_in).unwrap_or(i64::MAX);
        let expires_at = issued_at
            .checked_add_signed(Duration::seconds(expires_in))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let registration_expires_at =
            DateTime::from_timestamp(registration.client_secret_expires_at, 0).unwrap_or_default();

        Self {
            start_url: start_url.to_string(),
            region: region.to_string(),
            access_token: token.access_token.clone(),
            expires_at: format_timestamp(expires_at),
            client_id: registration.client_id.clone(),
            client_secret: registration.client_secret.clone(),
            registration_expires_at: format_timestamp(registration_expires_at),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires_at)
    }

    /// Entries with an unreadable expiry count as expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_none_or(|expires_at| expires_at <= now)
    }
}

impl std::fmt::Debug for CredentialCacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCacheEntry")
            .field("start_url", &self.start_url)
            .field("region", &self.region)
            .field("expires_at", &self.expires_at)
            .field("client_id", &self.client_id)
            .field("registration_expires_at", &self.registration_expires_at)
            .finish_non_exhaustive()
    }
}

/// `2024-01-01T12:00:00Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Accepts RFC3339 and the `...UTC` suffix older AWS CLI versions wrote
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let trimmed = value.strip_suffix("UTC")?;
    DateTime::parse_from_rfc3339(&format!("{}Z", trimmed))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Cache key for a start URL: lowercase hex SHA-1 of its bytes
pub fn cache_key(start_url: &str) -> String {
    hex::encode(Sha1::digest(start_url.as_bytes()))
}

/// The SSO cache directory
#[derive(Debug, Clone)]
pub struct CredentialCache {
    dir: PathBuf,
}

impl CredentialCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.aws/sso/cache`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(Self::new(home.join(".aws").join("sso").join("cache")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, start_url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(start_url)))
    }

    /// Write `entry`, replacing any previous login for the same start URL
    pub fn save(&self, entry: &CredentialCacheEntry) -> Result<PathBuf> {
        ensure_private_dir(&self.dir)
            .with_context(|| format!("Failed to create SSO cache directory: {:?}", self.dir))?;

        let path = self.path_for(&entry.start_url);
        let json = serde_json::to_vec(entry).context("Failed to serialize SSO cache entry")?;

        write_atomic(&path, &json, PRIVATE_FILE_MODE)
            .with_context(|| format!("Failed to write SSO cache file: {:?}", path))?;

        info!("Saved SSO cache entry to {:?}", path);
        Ok(path)
    }

    /// Read the entry for `start_url`, if one was cached
    pub fn load(&self, start_url: &str) -> Result<Option<CredentialCacheEntry>> {
        let path = self.path_for(start_url);
        debug!("Loading SSO cache entry from {:?}", path);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read SSO cache file: {:?}", path))?;
        let entry = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse SSO cache file: {:?}", path))?;

        Ok(Some(entry))
    }

    /// Delete every file in the cache directory, whatever its key.
    ///
    /// Returns the number of files removed. Fails when the directory does not exist.
    pub fn purge_all(&self) -> Result<usize> {
        if !self.dir.is_dir() {
            anyhow::bail!("Directory does not exist: {:?}", self.dir);
        }

        let removed = remove_files(&self.dir)?;
        info!("Removed {} files from {:?}", removed, self.dir);
        Ok(removed)
    }
}

fn remove_files(dir: &Path) -> Result<usize> {
    let mut removed = 0;

    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read directory: {:?}", dir))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to inspect {:?}", path))?;

        if file_type.is_dir() {
            removed += remove_files(&path)?;
        } else {
            fs::remove_file(&path).with_context(|| format!("Failed to delete file: {:?}", path))?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const START_URL: &str = "https://example.awsapps.com/start/";

    fn registration() -> ClientRegistration {
        ClientRegistration {
            client_id: "client-abcdef1234567890".to_string(),
            client_secret: "client-secret-abcdef1234567890".to_string(),
            client_secret_expires_at: 1_700_000_000,
        }
    }

    fn token(expires_in: u64) -> TokenResult {
        TokenResult {
            access_token: "T1".to_string(),
            refresh_token: None,
            id_token: None,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }

    fn entry() -> CredentialCacheEntry {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        CredentialCacheEntry::new(START_URL, "ap-northeast-1", &registration(), &token(3600), issued_at)
    }

    #[test]
    fn test_cache_key_golden_values() {
        assert_eq!(cache_key(START_URL), "8be3a7791abdeea628d9fbf768cc17b92db6f738");
        assert_eq!(
            cache_key("https://d-1234567890.awsapps.com/start/"),
            "ae4321de83751a696d13fbefb87d776773c41e1c"
        );
        assert_eq!(cache_key(START_URL), cache_key(START_URL));
    }

    #[test]
    fn test_entry_timestamps() {
        let entry = entry();
        assert_eq!(entry.expires_at, "2024-01-01T13:00:00Z");
        assert_eq!(entry.registration_expires_at, "2023-11-14T22:13:20Z");
        assert_eq!(entry.client_id, "client-abcdef1234567890");
    }

    #[test]
    fn test_entry_json_layout() {
        let json = serde_json::to_string(&entry()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"startUrl":"https://example.awsapps.com/start/","region":"ap-northeast-1","#,
                r#""accessToken":"T1","expiresAt":"2024-01-01T13:00:00Z","#,
                r#""clientId":"client-abcdef1234567890","clientSecret":"client-secret-abcdef1234567890","#,
                r#""registrationExpiresAt":"2023-11-14T22:13:20Z"}"#
            )
        );
    }

    #[test]
    fn test_expiry_checks() {
        let entry = entry();
        let before = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 1).unwrap();
        assert!(!entry.is_expired(before));
        assert!(entry.is_expired(after));

        let legacy = CredentialCacheEntry {
            expires_at: "2024-01-01T13:00:00UTC".to_string(),
            ..entry.clone()
        };
        assert_eq!(legacy.expires_at(), entry.expires_at());

        let garbage = CredentialCacheEntry {
            expires_at: "tomorrow".to_string(),
            ..entry
        };
        assert!(garbage.is_expired(before));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::new(dir.path().join("sso").join("cache"));

        let path = cache.save(&entry()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "8be3a7791abdeea628d9fbf768cc17b92db6f738.json"
        );

        let loaded = cache.load(START_URL).unwrap().unwrap();
        assert_eq!(loaded, entry());
        assert!(cache.load("https://other.awsapps.com/start/").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_same_start_url() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::new(dir.path());

        cache.save(&entry()).unwrap();
        let relogin = CredentialCacheEntry {
            access_token: "T2".to_string(),
            ..entry()
        };
        cache.save(&relogin).unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(cache.load(START_URL).unwrap().unwrap().access_token, "T2");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_uses_private_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::new(dir.path().join("cache"));
        let path = cache.save(&entry()).unwrap();

        let dir_mode = fs::metadata(cache.dir()).unwrap().permissions().mode() & 0o777;
        let file_mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
        assert_eq!(file_mode, 0o600);
    }

    #[test]
    fn test_purge_then_save_leaves_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::new(dir.path());

        fs::write(dir.path().join("0123456789abcdef.json"), "{}").unwrap();
        fs::write(dir.path().join("botocore-client-id.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("stale.json"), "{}").unwrap();

        assert_eq!(cache.purge_all().unwrap(), 3);
        cache.save(&entry()).unwrap();

        let files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().unwrap().is_file())
            .map(|e| e.file_name().into_string().unwrap())
            .collect();
        assert_eq!(files, vec!["8be3a7791abdeea628d9fbf768cc17b92db6f738.json".to_string()]);
    }

    #[test]
    fn test_purge_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::new(dir.path());
        assert_eq!(cache.purge_all().unwrap(), 0);
    }

    #[test]
    fn test_purge_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::new(dir.path().join("missing"));
        let err = cache.purge_all().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
