// Tidemark - Watermark-driven incremental bucket enumeration
// Copyright (c) 2025 Tidemark Contributors
// Licensed under the MIT License

//! # Tidemark - incremental bucket enumeration
//!
//! Tidemark discovers the objects in a remote storage bucket that changed
//! since the last successful processing run. It pairs a paginated,
//! filtered bucket lister with a single-row checkpoint table holding the
//! last-processed watermark.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Enumerating** every page of a bucket listing sequentially
//! - **Filtering** objects by modification time against a persisted
//!   watermark, excluding zero-byte `_$folder$` marker objects
//! - **Checkpointing** the watermark in an Azure Table with an idempotent
//!   bootstrap and optimistic-concurrency updates
//! - **Resolving** the bucket credential from an Azure Key Vault, cached
//!   once per process lifetime
//!
//! ## Architecture
//!
//! Tidemark follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (lister, filter, checkpoint store)
//! - [`adapters`] - External integrations (S3, Azure Table, Key Vault)
//! - [`api`] - Operation boundary consumed by an external HTTP layer
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tidemark::adapters::S3ObjectStore;
//! use tidemark::config::load_config;
//! use tidemark::core::IncrementalLister;
//! use tidemark::domain::Watermark;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tidemark.toml")?;
//!     let secret_key = tidemark::config::secret_string("resolved-from-vault".to_string());
//!
//!     let store = S3ObjectStore::connect(&config.bucket, &secret_key).await?;
//!     let lister = IncrementalLister::new(Arc::new(store));
//!
//!     let watermark = Watermark::parse("2024-01-01T00:00:00Z")?;
//!     let listing = lister.list(&config.bucket.name, watermark).await?;
//!
//!     println!("{} new objects", listing.objects.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Watermark semantics
//!
//! The filter is strict: an object whose `lastModified` equals the
//! watermark exactly is considered already processed. The unset sentinel
//! `0001-01-01T00:00:00Z` admits everything, so a fresh deployment's
//! first run enumerates the whole bucket.
//!
//! Each listing captures a wall-clock timestamp before the first page
//! request; callers persist it as the next watermark only after durably
//! processing the returned objects. An object modified mid-listing can
//! therefore appear in two consecutive runs, never in zero.
//!
//! ## Error Handling
//!
//! Tidemark uses the [`domain::TidemarkError`] type for all errors:
//!
//! ```rust
//! use tidemark::domain::{Result, Watermark};
//!
//! fn parse(input: &str) -> Result<Watermark> {
//!     let watermark = Watermark::parse(input)
//!         .map_err(tidemark::domain::TidemarkError::Validation)?;
//!     Ok(watermark)
//! }
//! ```

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
