//! Init command implementation
//!
//! Generates a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "tidemark.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set TIDEMARK_AAD_CLIENT_SECRET in your environment or .env file");
                println!("  3. Validate configuration: tidemark validate-config");
                println!("  4. Check the checkpoint state: tidemark status");
                println!("  5. Run an enumeration: tidemark list");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("  Error: {}", e);
                Ok(1)
            }
        }
    }

    /// Generate sample configuration
    fn generate_config() -> String {
        r#"# Tidemark Configuration File
# Watermark-driven incremental bucket enumeration

# Deployment environment: development | staging | production
# Production enforces https on every endpoint.
environment = "development"

[application]
name = "tidemark"
log_level = "info"

[bucket]
# Bucket to enumerate
name = "my-ingest-bucket"
region = "eu-west-1"

# Access key id; the matching secret access key is fetched from the key
# vault under secret_key_secret_name and cached for the process lifetime.
access_key_id = "AKIAEXAMPLE"
secret_key_secret_name = "s3-secret-access-key"

# Endpoint override for local test stacks (localstack/minio)
# endpoint = "http://localhost:4566"

[table]
# Azure Table service endpoint
endpoint = "https://myaccount.table.core.windows.net"

# Checkpoint table; created on first use with a single record holding the
# watermark in the property named below.
table_name = "watermarks"
watermark_property = "LastProcessedDateTimeUtc"

[key_vault]
vault_url = "https://my-vault.vault.azure.net"
tenant_id = "00000000-0000-0000-0000-000000000000"
client_id = "00000000-0000-0000-0000-000000000000"
client_secret = "${TIDEMARK_AAD_CLIENT_SECRET}"

[logging]
# Console logging is always on; enable file_enabled for a JSON log file
# with daily rotation.
file_enabled = false
file_path = "./logs"
"#
        .to_string()
    }
}
