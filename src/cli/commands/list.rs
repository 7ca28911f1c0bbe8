//! List command implementation
//!
//! Enumerates every bucket object modified since the stored watermark (or
//! an explicit `--since` override) and prints the operation payload as
//! pretty JSON.

use crate::adapters::{secrets, AadTokenProvider, KeyVaultClient, S3ObjectStore, TokenProvider};
use crate::api::{list_objects, OperationRequest, OperationResponse, LIST_FIELD};
use crate::config::load_config;
use crate::core::IncrementalLister;
use clap::Args;
use std::sync::Arc;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Watermark to list against; defaults to the stored watermark
    #[arg(long)]
    pub since: Option<String>,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        // --since overrides the stored watermark; without it the checkpoint
        // table is consulted, bootstrapping on first contact.
        let since = match &self.since {
            Some(since) => since.clone(),
            None => {
                let store = super::build_watermark_store(&config)?;
                store.current().await?.encode()
            }
        };

        let token_provider: Arc<dyn TokenProvider> =
            Arc::new(AadTokenProvider::new(&config.key_vault)?);
        let vault = KeyVaultClient::new(&config.key_vault.vault_url, token_provider)?;
        let secret_key =
            secrets::object_store_secret_key(&vault, &config.bucket.secret_key_secret_name).await?;

        let object_store = S3ObjectStore::connect(&config.bucket, &secret_key).await?;
        let lister = IncrementalLister::new(Arc::new(object_store));

        let request = OperationRequest::from_query([(LIST_FIELD.to_string(), since)]);
        match list_objects(&lister, &config.bucket.name, &request).await {
            OperationResponse::Success(payload) => {
                println!("{}", serde_json::to_string_pretty(&payload)?);
                Ok(0)
            }
            OperationResponse::ClientError(message) => {
                eprintln!("{message}");
                Ok(1)
            }
        }
    }
}
