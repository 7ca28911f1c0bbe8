//! Azure AD token acquisition
//!
//! The Azure Table service and the key vault both authenticate with AAD
//! bearer tokens obtained through the client-credentials flow. The
//! [`TokenProvider`] trait is the seam the REST adapters depend on, so
//! tests can inject a static token instead of calling the identity
//! endpoint.

use crate::config::KeyVaultConfig;
use crate::domain::{Result, TidemarkError};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_identity::ClientSecretCredential;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Token scope for the Azure Table service
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

/// Token scope for Azure Key Vault
pub const VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Provider of AAD bearer tokens for a given resource scope
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a bearer token for the given scope
    async fn bearer_token(&self, scope: &str) -> Result<String>;
}

/// Client-credentials token provider backed by `azure_identity`
pub struct AadTokenProvider {
    credential: Arc<ClientSecretCredential>,
}

impl AadTokenProvider {
    /// Create a token provider from the key-vault/AAD configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be constructed.
    pub fn new(config: &KeyVaultConfig) -> Result<Self> {
        let secret = azure_core::credentials::Secret::new(
            config.client_secret.expose_secret().as_ref().to_string(),
        );

        let credential = ClientSecretCredential::new(
            &config.tenant_id,
            config.client_id.clone(),
            secret,
            None,
        )
        .map_err(|e| {
            TidemarkError::Credential(format!("Failed to create Azure AD credential: {e}"))
        })?;

        Ok(Self { credential })
    }
}

#[async_trait]
impl TokenProvider for AadTokenProvider {
    async fn bearer_token(&self, scope: &str) -> Result<String> {
        let token = TokenCredential::get_token(&*self.credential, &[scope], None)
            .await
            .map_err(|e| {
                TidemarkError::Credential(format!("Failed to acquire Azure AD token: {e}"))
            })?;

        Ok(token.token.secret().to_string())
    }
}

/// Fixed-token provider for tests
#[cfg(test)]
pub struct StaticTokenProvider(pub String);

#[cfg(test)]
#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self, _scope: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}
