//! Parsing and validation of `kiln.toml` configuration files.
//!
//! This crate reads the optional configuration file and produces a
//! strongly-typed [`KilnConfig`], then resolves the effective cache root from
//! the file location and command-line overrides.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_settings, CacheSettings};
pub use types::*;
