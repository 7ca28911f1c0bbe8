//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing, so success here means the
        // configuration is usable.
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Application: {}", config.application.name);
                println!("  Log Level: {}", config.application.log_level);
                println!("  Environment: {:?}", config.environment);
                println!("  Bucket: {} ({})", config.bucket.name, config.bucket.region);
                if let Some(endpoint) = &config.bucket.endpoint {
                    println!("  Bucket Endpoint Override: {endpoint}");
                }
                println!("  Table Endpoint: {}", config.table.endpoint);
                println!("  Checkpoint Table: {}", config.table.table_name);
                println!("  Watermark Property: {}", config.table.watermark_property);
                println!("  Key Vault: {}", config.key_vault.vault_url);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Configuration validation failed");
                println!("  Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}
