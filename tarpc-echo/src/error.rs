use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Errors that can occur while serving or calling the echo service
#[derive(Error, Debug)]
pub enum Error {
    /// The server could not acquire its listening endpoint
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    /// The client could not reach the server
    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: String, source: io::Error },

    /// The call failed in transit or the response could not be decoded
    #[error("echo call failed: {0}")]
    Call(#[from] tarpc::client::RpcError),

    /// Connecting or calling took longer than the client timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The configuration file could not be read
    #[error("failed to read config file '{}': {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    /// The configuration file is not valid TOML for this program
    #[error("failed to parse config file '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Result type alias for echo operations
pub type Result<T> = std::result::Result<T, Error>;
