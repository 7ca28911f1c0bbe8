//! Configuration management
//!
//! TOML configuration with `${VAR}` environment substitution, `TIDEMARK_*`
//! overrides, validation on load and secrecy-backed credential fields.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BucketConfig, Environment, KeyVaultConfig, LoggingConfig, TableConfig,
    TidemarkConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
