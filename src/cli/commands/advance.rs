//! Advance command implementation

use crate::api::{advance_watermark, OperationRequest, OperationResponse, ADVANCE_FIELD};
use crate::config::load_config;
use clap::Args;

/// Arguments for the advance command
#[derive(Args, Debug)]
pub struct AdvanceArgs {
    /// New watermark value (RFC 3339 timestamp)
    #[arg(long)]
    pub to: String,
}

impl AdvanceArgs {
    /// Execute the advance command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let store = super::build_watermark_store(&config)?;

        let request =
            OperationRequest::from_query([(ADVANCE_FIELD.to_string(), self.to.clone())]);
        match advance_watermark(&store, &request).await {
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
