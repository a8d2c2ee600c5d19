use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

const SERVICE_NAME: &str = "cycl3";

/// App passwords kept in the OS keychain, keyed by login identifier.
///
/// The keychain only ever prefills the login form. A missing or unreadable
/// entry is never an error for callers that just want a prefill.
pub struct CredentialStore;

impl CredentialStore {
    fn entry(identifier: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, identifier).context("Failed to create keyring entry")
    }

    /// Save the password used for a successful login
    pub fn store(identifier: &str, password: &str) -> Result<()> {
        Self::entry(identifier)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// Password to prefill for an identifier, if the keychain has one
    pub fn remembered_password(identifier: &str) -> Option<String> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        match Self::entry(identifier).and_then(|e| e.get_password().map_err(Into::into)) {
            Ok(password) => Some(password),
            Err(e) => {
                debug!(error = %e, "No remembered password");
                None
            }
        }
    }

    /// Remove the stored password for an identifier.
    /// Returns false when there was nothing to remove.
    pub fn forget(identifier: &str) -> Result<bool> {
        if identifier.trim().is_empty() {
            return Ok(false);
        }
        match Self::entry(identifier)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}
