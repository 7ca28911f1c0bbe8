//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::TidemarkConfig;
use crate::config::secret_string;
use crate::domain::errors::TidemarkError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TidemarkConfig
/// 4. Applies environment variable overrides (TIDEMARK_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
pub fn load_config(path: impl AsRef<Path>) -> Result<TidemarkConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TidemarkError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TidemarkError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: TidemarkConfig = toml::from_str(&contents)
        .map_err(|e| TidemarkError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        TidemarkError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TidemarkError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using TIDEMARK_* prefix
///
/// Environment variables follow the pattern: TIDEMARK_<SECTION>_<KEY>
/// For example: TIDEMARK_BUCKET_NAME, TIDEMARK_TABLE_ENDPOINT
fn apply_env_overrides(config: &mut TidemarkConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("TIDEMARK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Bucket overrides
    if let Ok(val) = std::env::var("TIDEMARK_BUCKET_NAME") {
        config.bucket.name = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_BUCKET_REGION") {
        config.bucket.region = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_BUCKET_ACCESS_KEY_ID") {
        config.bucket.access_key_id = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_BUCKET_SECRET_KEY_SECRET_NAME") {
        config.bucket.secret_key_secret_name = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_BUCKET_ENDPOINT") {
        config.bucket.endpoint = Some(val);
    }

    // Table overrides
    if let Ok(val) = std::env::var("TIDEMARK_TABLE_ENDPOINT") {
        config.table.endpoint = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_TABLE_TABLE_NAME") {
        config.table.table_name = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_TABLE_WATERMARK_PROPERTY") {
        config.table.watermark_property = val;
    }

    // Key vault overrides
    if let Ok(val) = std::env::var("TIDEMARK_KEY_VAULT_VAULT_URL") {
        config.key_vault.vault_url = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_KEY_VAULT_TENANT_ID") {
        config.key_vault.tenant_id = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_KEY_VAULT_CLIENT_ID") {
        config.key_vault.client_id = val;
    }
    if let Ok(val) = std::env::var("TIDEMARK_KEY_VAULT_CLIENT_SECRET") {
        config.key_vault.client_secret = secret_string(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TIDEMARK_LOGGING_FILE_ENABLED") {
        config.logging.file_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("TIDEMARK_LOGGING_FILE_PATH") {
        config.logging.file_path = val;
    }
}
