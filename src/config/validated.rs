//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration used by the
//! `send` command. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};

use crate::payload::Payload;
use crate::pipeline::RequestIntent;

use super::cli::{Cli, SendArgs};
use super::error::ConfigError;
use super::settings::{ClientConfig, LoggingConfig};
use super::toml::TomlConfig;

/// Fully validated configuration for one `send` invocation.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and an optional
/// TOML config, or [`ValidatedConfig::load`] to read the file named by
/// `--config`.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Client settings, already validated
    pub client: ClientConfig,

    /// The request to send
    pub intent: RequestIntent,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) with {}",
            self.intent.method, self.intent.url, self.intent.description, self.client
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from `send` arguments and optional
    /// TOML config.
    ///
    /// CLI overrides win over the file, which wins over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML values are out of range
    /// - The merged client configuration fails validation
    /// - The method, a header, a parameter, or the JSON payload is malformed
    pub fn from_raw(
        args: &SendArgs,
        toml: Option<&TomlConfig>,
        verbose: bool,
    ) -> Result<Self, ConfigError> {
        let client = Self::resolve_client(args, toml)?;
        client.validate()?;

        let intent = RequestIntent::new(
            parse_method(&args.method)?,
            args.description.clone(),
            args.url.clone(),
        )
        .with_headers(parse_headers(&args.headers)?)
        .with_payload(parse_payload(args)?);

        Ok(Self {
            client,
            intent,
            verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli, args: &SendArgs) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(args, toml.as_ref(), cli.verbose)
    }

    fn resolve_client(
        args: &SendArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<ClientConfig, ConfigError> {
        let mut client = match toml {
            Some(toml) => {
                toml.to_client_config_with_timeout(args.timeout_ms.map(Duration::from_millis))?
            }
            None => ClientConfig::default(),
        };

        if let Some(ms) = args.timeout_ms {
            client.base_timeout = Duration::from_millis(ms);
        }

        if let Some(retries) = args.retries {
            client.retry = client.retry.with_max_retries(retries);
        }
        if let Some(ms) = args.retry_delay_ms {
            client.retry = client.retry.with_retry_delay(Duration::from_millis(ms));
        }

        if args.insecure {
            client = client.with_insecure_tls();
        }
        if args.no_log {
            client = client.with_logging(LoggingConfig::disabled());
        }

        Ok(client)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_method(s: &str) -> Result<Method, ConfigError> {
    let upper = s.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(ConfigError::InvalidMethod(s.to_string()));
    }
    upper
        .parse::<Method>()
        .map_err(|_| ConfigError::InvalidMethod(s.to_string()))
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    // Append so that repeated names are all sent
    for header_str in raw {
        let (name, value) = parse_header_string(header_str)?;
        headers.append(parse_header_name(&name)?, parse_header_value(&name, &value)?);
    }

    Ok(headers)
}

fn parse_payload(args: &SendArgs) -> Result<Payload, ConfigError> {
    if let Some(json) = &args.json {
        let value = serde_json::from_str(json).map_err(ConfigError::InvalidJson)?;
        return Ok(Payload::Json(value));
    }
    if let Some(text) = &args.text {
        return Ok(Payload::Text(text.clone()));
    }
    if let Some(xml) = &args.xml {
        return Ok(Payload::Xml(xml.clone()));
    }
    if args.params.is_empty() {
        return Ok(Payload::Empty);
    }

    let pairs = args
        .params
        .iter()
        .map(|param| {
            param
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                .ok_or_else(|| ConfigError::InvalidQuery {
                    value: param.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Payload::from_pairs(pairs))
}

/// Splits "Key=Value" or "Key: Value" at whichever separator comes first,
/// so values may contain the other one (`Authorization: Basic dXNlcg==`).
fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    let Some(split) = s.find(['=', ':']) else {
        return Err(ConfigError::InvalidHeader {
            value: s.to_string(),
        });
    };

    let (name, value) = (&s[..split], &s[split + 1..]);
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
