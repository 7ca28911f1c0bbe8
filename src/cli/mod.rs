//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tidemark using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Tidemark - incremental bucket enumeration tool
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tidemark.toml", env = "TIDEMARK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TIDEMARK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List objects modified since the stored or given watermark
    List(commands::list::ListArgs),

    /// Advance the stored watermark to a new timestamp
    Advance(commands::advance::AdvanceArgs),

    /// Show the checkpoint table state and the stored watermark
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
