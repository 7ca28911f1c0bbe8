//! Key vault secret retrieval
//!
//! The object-storage secret access key lives in an Azure Key Vault. It is
//! fetched at most once per process lifetime and cached in process-wide
//! state; the cache is never populated on failure, so the next call
//! repeats the lookup. A re-fetch only happens on deployment restart.

use crate::adapters::auth::{TokenProvider, VAULT_SCOPE};
use crate::config::{secret_string, SecretString};
use crate::domain::{Result, TidemarkError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Azure Key Vault client
pub struct KeyVaultClient {
    /// Vault base URL, e.g. `https://my-vault.vault.azure.net`
    vault_url: String,

    /// AAD token provider
    token_provider: Arc<dyn TokenProvider>,

    /// HTTP client for API calls
    http_client: reqwest::Client,
}

impl KeyVaultClient {
    /// Create a new Key Vault client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(vault_url: &str, token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                TidemarkError::Credential(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            vault_url: vault_url.trim_end_matches('/').to_string(),
            token_provider,
            http_client,
        })
    }

    /// Fetch a secret's current value from the vault
    ///
    /// # Errors
    ///
    /// Returns a credential error if the lookup fails for any reason; the
    /// caller must not cache anything on this path.
    pub async fn get_secret(&self, name: &str) -> Result<SecretString> {
        let token = self.token_provider.bearer_token(VAULT_SCOPE).await?;
        let url = format!("{}/secrets/{}?api-version=7.4", self.vault_url, name);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| {
                TidemarkError::Credential(format!("Key vault request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TidemarkError::Credential(format!(
                "Key vault returned {status} for secret '{name}': {body}"
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            TidemarkError::Credential(format!("Invalid key vault response: {e}"))
        })?;

        let value = body
            .get("value")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                TidemarkError::Credential(format!(
                    "Key vault response for secret '{name}' has no value"
                ))
            })?;

        Ok(secret_string(value.to_string()))
    }
}

/// Process-wide cache of the object-storage secret access key.
///
/// Populated on first successful lookup only; subsequent calls return the
/// cached value without touching the vault until the process restarts.
static OBJECT_STORE_SECRET_KEY: OnceCell<SecretString> = OnceCell::const_new();

/// Resolve the object-storage secret access key, consulting the vault at
/// most once per process lifetime.
pub async fn object_store_secret_key(
    vault: &KeyVaultClient,
    secret_name: &str,
) -> Result<SecretString> {
    OBJECT_STORE_SECRET_KEY
        .get_or_try_init(|| async {
            tracing::info!(
                secret_name = %secret_name,
                "Fetching object-storage secret key for the first time from the key vault"
            );
            let secret = vault.get_secret(secret_name).await?;
            tracing::info!("Successfully fetched object-storage secret key from the key vault");
            Ok::<_, TidemarkError>(secret)
        })
        .await
        .cloned()
}
