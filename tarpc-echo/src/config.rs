//! Configuration for the echo binaries.
//!
//! Values come from command-line arguments and an optional TOML file.
//! CLI arguments take precedence over the file, which takes precedence over
//! the built-in defaults.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Endpoint used by both binaries when nothing else is configured.
pub const DEFAULT_ADDR: &str = "127.0.0.1:50051";

/// Text the client sends when no argument is given.
pub const DEFAULT_TEXT: &str = "Hello, echo!";

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments for the echo server
#[derive(Parser, Debug)]
#[command(name = "echo_server")]
#[command(version)]
#[command(about = "Serves the Echo RPC over TCP", long_about = None)]
pub struct ServerArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on (e.g., 127.0.0.1:50051)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Command-line arguments for the echo client
#[derive(Parser, Debug)]
#[command(name = "echo_client")]
#[command(version)]
#[command(about = "Sends one Echo RPC and prints the reply", long_about = None)]
pub struct ClientArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server address to connect to
    #[arg(short = 'a', long)]
    pub connect: Option<String>,

    /// Connect and call timeout in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Text to echo
    pub text: Option<String>,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub listen: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    pub connect: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
}

impl TomlConfig {
    /// Reads `path`, or returns the empty configuration when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: String,
    pub log_level: String,
}

impl ServerConfig {
    pub fn resolve(args: ServerArgs) -> Result<Self> {
        let file = TomlConfig::load(args.config.as_deref())?;
        Ok(Self::merge(args, file))
    }

    fn merge(args: ServerArgs, file: TomlConfig) -> Self {
        Self {
            listen: args
                .listen
                .or(file.server.listen)
                .unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            log_level: args
                .log_level
                .or(file.logging.level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub connect: String,
    pub timeout: Duration,
    pub log_level: String,
    pub text: String,
}

impl ClientConfig {
    pub fn resolve(args: ClientArgs) -> Result<Self> {
        let file = TomlConfig::load(args.config.as_deref())?;
        Ok(Self::merge(args, file))
    }

    fn merge(args: ClientArgs, file: TomlConfig) -> Self {
        let timeout_ms = args
            .timeout_ms
            .or(file.client.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Self {
            connect: args
                .connect
                .or(file.client.connect)
                .unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            timeout: Duration::from_millis(timeout_ms),
            log_level: args
                .log_level
                .or(file.logging.level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            text: args.text.unwrap_or_else(|| DEFAULT_TEXT.to_string()),
        }
    }
}
