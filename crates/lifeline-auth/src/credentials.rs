//! Persisted sign-in credential for the hosted provider.
//!
//! Holds the refresh token that lets the CLI restore a session between runs.
//! Lookup order: OS keychain, then `LIFELINE_AUTH__CREDENTIALS` (JSON),
//! then `~/.lifeline/credentials` (0600).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CredentialError;

const DEFAULT_KEYRING_SERVICE: &str = "lifeline-cli";
const KEYRING_USER: &str = "refresh-token";
const CREDENTIALS_FILE_NAME: &str = "credentials";
const CREDENTIALS_ENV: &str = "LIFELINE_AUTH__CREDENTIALS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    pub refresh_token: String,
}

impl StoredCredentials {
    fn encode(&self) -> Result<String, CredentialError> {
        serde_json::to_string(self).map_err(|e| CredentialError::Malformed(e.to_string()))
    }

    fn decode(raw: &str) -> Result<Self, CredentialError> {
        serde_json::from_str(raw).map_err(|e| CredentialError::Malformed(e.to_string()))
    }
}

/// Keyring service name. `LIFELINE_KEYRING_SERVICE` overrides it so tests
/// never touch real credentials.
fn keyring_service() -> String {
    std::env::var("LIFELINE_KEYRING_SERVICE")
        .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Save `credentials` to the keychain, falling back to the credentials file.
///
/// # Errors
///
/// Returns `CredentialError::Store` if both the keychain and the file fail.
pub fn store(credentials: &StoredCredentials) -> Result<(), CredentialError> {
    let encoded = credentials.encode()?;
    match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        Ok(entry) => match entry.set_password(&encoded) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                store_file_at(&credentials_path()?, &encoded)
            }
        },
        Err(error) => {
            tracing::warn!(%error, "keyring unavailable; falling back to file");
            store_file_at(&credentials_path()?, &encoded)
        }
    }
}

/// Load the saved credential, if any. Malformed entries are skipped.
#[must_use]
pub fn load() -> Option<StoredCredentials> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && let Ok(raw) = entry.get_password()
        && let Some(credentials) = parse_logged(&raw, "keyring")
    {
        return Some(credentials);
    }

    if let Ok(raw) = std::env::var(CREDENTIALS_ENV)
        && let Some(credentials) = parse_logged(&raw, "env")
    {
        return Some(credentials);
    }

    let path = credentials_path().ok()?;
    load_file_at(&path)
}

/// Remove the credential from the keychain and the file.
///
/// # Errors
///
/// Returns `CredentialError::Store` if the credentials file cannot be removed.
pub fn delete() -> Result<(), CredentialError> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        let _ = entry.delete_credential();
    }

    let path = credentials_path()?;
    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            CredentialError::Store(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}

/// Where the current credential came from, for `auth status`.
#[must_use]
pub fn detect_source() -> Option<&'static str> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && entry.get_password().is_ok_and(|raw| !raw.trim().is_empty())
    {
        return Some("keyring");
    }
    if std::env::var(CREDENTIALS_ENV).is_ok_and(|raw| !raw.trim().is_empty()) {
        return Some("env");
    }
    credentials_path()
        .ok()
        .and_then(|path| load_file_at(&path))
        .map(|_| "file")
}

fn parse_logged(raw: &str, source: &str) -> Option<StoredCredentials> {
    if raw.trim().is_empty() {
        return None;
    }
    match StoredCredentials::decode(raw) {
        Ok(credentials) => Some(credentials),
        Err(error) => {
            tracing::warn!(%error, source, "ignoring malformed stored credential");
            None
        }
    }
}

fn credentials_path() -> Result<PathBuf, CredentialError> {
    dirs::home_dir()
        .map(|h| h.join(".lifeline").join(CREDENTIALS_FILE_NAME))
        .ok_or_else(|| {
            CredentialError::Store("home directory not found; cannot store credentials".into())
        })
}

fn store_file_at(path: &Path, encoded: &str) -> Result<(), CredentialError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CredentialError::Store(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, encoded)
        .map_err(|e| CredentialError::Store(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| CredentialError::Store(format!("chmod {}: {e}", path.display())))?;
    }
    Ok(())
}

fn load_file_at(path: &Path) -> Option<StoredCredentials> {
    let raw = fs::read_to_string(path).ok()?;
    parse_logged(&raw, "file")
}
