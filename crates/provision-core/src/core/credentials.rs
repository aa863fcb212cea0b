use crate::core::error::{ProvisionError, ProvisionResult};
use keyring::Entry;

/// Service name for keyring entries
const KEYRING_SERVICE: &str = "provision";

/// Keychain key holding the artifact hub access token
pub const HUB_TOKEN_KEY: &str = "hub_token";

/// Manages credential storage using OS keychain
///
/// Platform support:
/// - macOS: Keychain
/// - Windows: Credential Manager
/// - Linux: Secret Service (libsecret)
pub struct CredentialStore;

impl CredentialStore {
    /// Store a credential in the OS keychain
    pub fn store(key: &str, value: &str) -> ProvisionResult<()> {
        Self::entry(key)?.set_password(value).map_err(|e| {
            ProvisionError::Credential(format!("Failed to store credential in keychain: {}", e))
        })
    }

    /// Retrieve a credential from the OS keychain
    pub fn retrieve(key: &str) -> ProvisionResult<String> {
        Self::entry(key)?.get_password().map_err(|e| {
            ProvisionError::Credential(format!(
                "Failed to retrieve credential from keychain: {}",
                e
            ))
        })
    }

    /// Delete a credential from the OS keychain
    pub fn delete(key: &str) -> ProvisionResult<()> {
        Self::entry(key)?.delete_credential().map_err(|e| {
            ProvisionError::Credential(format!("Failed to delete credential from keychain: {}", e))
        })
    }

    /// Check if a credential exists in the keychain
    pub fn exists(key: &str) -> bool {
        Self::retrieve(key).is_ok()
    }

    fn entry(key: &str) -> ProvisionResult<Entry> {
        Entry::new(KEYRING_SERVICE, key).map_err(|e| {
            ProvisionError::Credential(format!("Failed to create keyring entry: {}", e))
        })
    }
}
