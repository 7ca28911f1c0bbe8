//! Command implementations

pub mod advance;
pub mod init;
pub mod list;
pub mod status;
pub mod validate;

use crate::adapters::{AadTokenProvider, AzureTableStore, TokenProvider};
use crate::config::TidemarkConfig;
use crate::core::WatermarkStore;
use std::sync::Arc;

/// Build the watermark store for the configured checkpoint table
pub(crate) fn build_watermark_store(config: &TidemarkConfig) -> anyhow::Result<WatermarkStore> {
    let token_provider: Arc<dyn TokenProvider> = Arc::new(AadTokenProvider::new(&config.key_vault)?);
    let table_store = AzureTableStore::new(&config.table.endpoint, token_provider)?;

    Ok(WatermarkStore::new(
        Arc::new(table_store),
        config.table.table_name.clone(),
        config.table.watermark_property.clone(),
    ))
}
