//! Configuration schema with serde structs and validation

use super::secret::SecretString;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidemarkConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,

    /// Source bucket settings
    pub bucket: BucketConfig,

    /// Checkpoint table settings
    pub table: TableConfig,

    /// Key vault and AAD client settings
    pub key_vault: KeyVaultConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name used in log output
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Source bucket settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Bucket name to enumerate
    pub name: String,

    /// Bucket region
    pub region: String,

    /// Access key id; the matching secret key is fetched from the vault
    pub access_key_id: String,

    /// Name of the vault secret holding the secret access key
    pub secret_key_secret_name: String,

    /// Endpoint override for local test stacks
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Checkpoint table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table service endpoint, e.g. `https://account.table.core.windows.net`
    pub endpoint: String,

    /// Checkpoint table name
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Name of the property holding the watermark
    #[serde(default = "default_watermark_property")]
    pub watermark_property: String,
}

/// Key vault and AAD client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyVaultConfig {
    /// Vault base URL, e.g. `https://my-vault.vault.azure.net`
    pub vault_url: String,

    /// AAD tenant id
    pub tenant_id: String,

    /// AAD client id
    pub client_id: String,

    /// AAD client secret
    pub client_secret: SecretString,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to write a JSON log file in addition to the console
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for rotated log files
    #[serde(default = "default_log_path")]
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            file_path: default_log_path(),
        }
    }
}

fn default_app_name() -> String {
    "tidemark".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_table_name() -> String {
    "watermarks".to_string()
}

fn default_watermark_property() -> String {
    "LastProcessedDateTimeUtc".to_string()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

impl TidemarkConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a message describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.name.trim().is_empty() {
            return Err("bucket.name must not be empty".to_string());
        }
        if self.bucket.region.trim().is_empty() {
            return Err("bucket.region must not be empty".to_string());
        }
        if self.bucket.access_key_id.trim().is_empty() {
            return Err("bucket.access_key_id must not be empty".to_string());
        }
        if self.bucket.secret_key_secret_name.trim().is_empty() {
            return Err("bucket.secret_key_secret_name must not be empty".to_string());
        }

        if self.table.endpoint.trim().is_empty() {
            return Err("table.endpoint must not be empty".to_string());
        }
        if self.table.table_name.trim().is_empty() {
            return Err("table.table_name must not be empty".to_string());
        }
        if !self
            .table
            .table_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
        {
            return Err("table.table_name must be alphanumeric".to_string());
        }
        if self.table.watermark_property.trim().is_empty() {
            return Err("table.watermark_property must not be empty".to_string());
        }

        if self.key_vault.vault_url.trim().is_empty() {
            return Err("key_vault.vault_url must not be empty".to_string());
        }
        if self.key_vault.tenant_id.trim().is_empty() {
            return Err("key_vault.tenant_id must not be empty".to_string());
        }
        if self.key_vault.client_id.trim().is_empty() {
            return Err("key_vault.client_id must not be empty".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.as_str()) {
            return Err(format!(
                "application.log_level must be one of: {}",
                valid_levels.join(", ")
            ));
        }

        // Production traffic never goes over plain http.
        if self.environment == Environment::Production {
            for (field, url) in [
                ("table.endpoint", self.table.endpoint.as_str()),
                ("key_vault.vault_url", self.key_vault.vault_url.as_str()),
            ] {
                if !url.starts_with("https://") {
                    return Err(format!("{field} must use https in production"));
                }
            }
            if let Some(endpoint) = &self.bucket.endpoint {
                if !endpoint.starts_with("https://") {
                    return Err("bucket.endpoint must use https in production".to_string());
                }
            }
        }

        Ok(())
    }
}
