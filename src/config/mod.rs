//! Configuration layer for netcall.
//!
//! This module provides:
//! - The client configuration bundle ([`ClientConfig`] and its parts)
//! - CLI argument parsing ([`Cli`], [`Command`], [`SendArgs`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration for the `send` command ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** (`--timeout-ms`, `--retries`, ...)
//! 2. **TOML config file** (`--config`)
//! 3. **Built-in defaults**
//!
//! A TOML section replaces the whole sub-structure it describes; keys left
//! out of a present section take their built-in default.
//!
//! # Boolean Flags
//!
//! `--insecure` and `--no-log` only switch features off. They cannot turn
//! verification or logging back on if the file disabled it.

mod cli;
pub mod defaults;
mod error;
mod settings;
mod toml;
mod validated;

#[cfg(test)]
mod settings_tests;

pub use cli::{Cli, Command, SendArgs};
pub use error::ConfigError;
pub use settings::{ClientConfig, ConnectionConfig, LoggingConfig, TimeoutConfig, TlsConfig};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
