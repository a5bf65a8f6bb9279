use std::path::PathBuf;

use thiserror::Error;

use crate::receptor::ReceptorError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("App {process_guid}, is already running")]
    AppAlreadyRunning { process_guid: String },
    #[error("{process_guid}, is not started. Please start an app first")]
    AppNotStarted { process_guid: String },
    /// Backend failures are surfaced exactly as the receptor reported them.
    #[error(transparent)]
    Receptor(#[from] ReceptorError),
    #[error("{process_guid} took too long to start (waited {waited_secs}s).")]
    StartTimedOut {
        process_guid: String,
        waited_secs: u64,
    },
    #[error("No target is configured. Run `ltc target <DOMAIN>` first.")]
    NoTarget,
    #[error("Failed to read configuration file at {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Configuration at {path} could not be parsed: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Configuration at {path} is invalid: {message}")]
    InvalidConfig { path: PathBuf, message: String },
    #[error("Failed to serialize configuration: {source}")]
    SerializeConfig {
        #[source]
        source: toml::ser::Error,
    },
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write configuration file at {path}: {source}")]
    WriteConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write output: {source}")]
    Output {
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Output { source }
    }
}
