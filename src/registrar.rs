//! Remote manifest registration.
//!
//! Read-modify-write of the object's manifest over an existing SFTP session:
//! locate the manifest by the SHA-1 of the object name, append a storage entry
//! for the local replica, write the result back atomically. Linear, no retries;
//! a concurrent invocation against the same object would race on the same
//! remote file.

use crate::config::RepoConfig;
use crate::manifest::Manifest;
use crate::transfer::RemoteSession;
use crate::utils::errors::Result;
use crate::utils::hash::manifest_id;

/// Register `localrepo` as an additional storage location for `ndnname` in its
/// remote manifest. Returns the patched manifest as written.
pub fn register_local_storage(
    remote: &RemoteSession,
    config: &RepoConfig,
    localrepo: &str,
    ndnname: &str,
) -> Result<Manifest> {
    let hashid = manifest_id(ndnname);
    let path = config.manifest_path(&hashid);
    tracing::info!(ndnname, manifest = %path.display(), "Updating object manifest");

    let raw = remote.read_file(&path)?;
    let mut manifest: Manifest = serde_json::from_slice(&raw)?;

    manifest.register_storage(localrepo)?;
    tracing::debug!(manifest = ?manifest, "Patched manifest");

    remote.write_file_atomic(&path, &serde_json::to_vec(&manifest)?)?;
    tracing::info!(localrepo, storages = manifest.storages.len(), "Manifest updated");
    Ok(manifest)
}
