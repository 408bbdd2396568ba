//! ndncopyfile library
//!
//! Mirrors a remote NDN repo to the local host and registers the local replica
//! as a storage location in per-object JSON manifests kept on the remote.

pub mod config;
pub mod manifest;
pub mod registrar;
pub mod sync;
pub mod transfer;
pub mod utils;

// Re-export commonly used types
pub use config::RepoConfig;
pub use manifest::Manifest;
pub use transfer::{HostKeyPolicy, RemoteSession};
pub use utils::errors::CopyError;
pub type Result<T> = std::result::Result<T, CopyError>;
