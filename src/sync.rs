//! Repo mirroring via an rsync subprocess.
//!
//! One-way archive-mode copy of the remote repo root into the same path on the
//! local host. Group and owner bits are excluded so local ownership is not
//! clobbered; everything else archive mode preserves (recursion, symlinks,
//! timestamps, permission bits) is kept.

use std::process::{Command, Stdio};

use crate::config::RepoConfig;
use crate::utils::errors::{CopyError, Result};

/// Mirror `<remote>:<root>/` into `<root>/` locally, blocking until the copy
/// finishes. A non-zero exit aborts the run: the manifest must not advertise a
/// replica the sync failed to produce.
pub fn mirror_repo(remote: &str, config: &RepoConfig) -> Result<()> {
    let args = rsync_args(remote, config);
    tracing::debug!(program = %config.rsync_program, ?args, "Running repo sync");

    let status = Command::new(&config.rsync_program)
        .args(&args)
        .stdout(Stdio::null())
        .status()?;

    if !status.success() {
        return Err(CopyError::SyncFailed { status });
    }

    tracing::info!(remote, root = %config.root.display(), "Repo sync complete");
    Ok(())
}

/// Argument vector for the copy program: archive mode minus group/owner, remote
/// source first, identical local destination second.
fn rsync_args(remote: &str, config: &RepoConfig) -> Vec<String> {
    let root = config.root_with_slash();
    vec![
        "-a".to_string(),
        "--no-g".to_string(),
        "--no-o".to_string(),
        format!("{remote}:{root}"),
        root,
    ]
}
