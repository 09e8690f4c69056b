//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// netcall: send one HTTP request with timeout, retry, and logging policy.
#[derive(Debug, Parser)]
#[command(name = "netcall")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for netcall
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "netcall.toml")]
        output: PathBuf,
    },

    /// Send a request and print the response body
    Send(SendArgs),
}

/// Arguments of the `send` subcommand.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct SendArgs {
    /// HTTP method (GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS)
    pub method: String,

    /// Target URL
    pub url: String,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", short = 'H', value_name = "K=V")]
    pub headers: Vec<String>,

    /// Payload field in 'key=value' format (can be specified multiple times).
    ///
    /// Sent as a query parameter for GET/DELETE/HEAD/OPTIONS and as a JSON
    /// object member otherwise.
    #[arg(long = "param", short = 'p', value_name = "K=V", conflicts_with_all = ["json", "text", "xml"])]
    pub params: Vec<String>,

    /// JSON payload
    #[arg(long, conflicts_with_all = ["text", "xml"])]
    pub json: Option<String>,

    /// Raw string payload (sent JSON-quoted)
    #[arg(long, conflicts_with = "xml")]
    pub text: Option<String>,

    /// Raw XML payload (sent byte-for-byte)
    #[arg(long)]
    pub xml: Option<String>,

    /// Human-readable label used in log output
    #[arg(long, default_value = "netcall request")]
    pub description: String,

    /// Base timeout for the whole call in milliseconds
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Number of retries after the initial attempt
    #[arg(long)]
    pub retries: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long = "retry-delay-ms")]
    pub retry_delay_ms: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Disable request/response logging
    #[arg(long = "no-log")]
    pub no_log: bool,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
