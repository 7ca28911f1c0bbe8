//! Status command implementation
//!
//! Shows the checkpoint table state and the stored watermark.

use crate::config::load_config;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        println!("Tidemark Status");
        println!();
        println!("  Bucket: {}", config.bucket.name);
        println!("  Region: {}", config.bucket.region);
        println!("  Checkpoint table: {}", config.table.table_name);
        println!("  Watermark property: {}", config.table.watermark_property);
        println!();

        let store = super::build_watermark_store(&config)?;
        match store.current().await {
            Ok(watermark) => {
                if watermark.is_unset() {
                    println!("  Stored watermark: unset (never processed)");
                } else {
                    println!("  Stored watermark: {watermark}");
                }
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored watermark");
                eprintln!("Failed to read stored watermark: {e}");
                Ok(1)
            }
        }
    }
}
