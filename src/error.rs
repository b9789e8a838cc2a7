// Error types for the configuration store and the push command.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, prompting for or writing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read (usually: it does not exist yet).
    #[error("couldn't read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file exists but is not valid JSON.
    #[error("config file is corrupt, {0}")]
    Decode(#[source] serde_json::Error),
    /// The configuration could not be encoded as JSON.
    #[error("error while encoding config file, {0}")]
    Encode(#[source] serde_json::Error),
    /// The config directory or file could not be written.
    #[error("couldn't write config file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading an answer from the terminal failed.
    #[error("couldn't read input: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Errors that stop a push. Each one maps to exit code 1.
#[derive(Debug, Error)]
pub enum PushError {
    /// The local file is missing or unreadable.
    #[error("couldn't read file {}, {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The request never got a response.
    #[error("couldn't send request, {0}")]
    Network(#[from] reqwest::Error),
    /// GitHub answered with a status above the success threshold.
    #[error("error received from github, {body}")]
    Remote {
        /// HTTP status code received.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },
}
