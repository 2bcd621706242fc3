use crate::domain::model::Secret;
use crate::domain::ports::CredentialStore;
use crate::utils::error::{AgentError, Result};

/// Reads passwords from the OS credential store (Windows Credential Manager,
/// macOS Keychain, Linux kernel keyutils).
#[derive(Debug, Clone, Default)]
pub struct KeyringStore;

impl CredentialStore for KeyringStore {
    fn get_password(&self, service: &str, account: &str) -> Result<Secret> {
        let credential_error = |e: keyring::Error| AgentError::Credential {
            service: service.to_string(),
            account: account.to_string(),
            message: e.to_string(),
        };

        let entry = keyring::Entry::new(service, account).map_err(credential_error)?;
        entry
            .get_password()
            .map(Secret::new)
            .map_err(credential_error)
    }
}
