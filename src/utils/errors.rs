//! Custom error types for the repo copy tool.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repo sync failed: rsync exited with {status}")]
    SyncFailed { status: ExitStatus },

    #[error("Manifest has no storage entries to copy")]
    EmptyStorages,

    #[error("Cannot open remote file {path}: {source}")]
    RemoteOpen { path: PathBuf, source: ssh2::Error },

    #[error("No known host key for {host}; re-run with --accept-new-host-key to trust it")]
    UnknownHostKey { host: String },

    #[error("Host key for {host} does not match known_hosts entry")]
    HostKeyMismatch { host: String },

    #[error("Authentication error: {0}")]
    Authentication(String),
}

pub type Result<T> = std::result::Result<T, CopyError>;
