//! Repository configuration.
//!
//! The repo root is the same absolute path on the remote and local hosts: it is
//! both the rsync destination and the base of the remote manifest directory.
//! Passed explicitly so tests can point it at a temporary directory.

use std::path::PathBuf;

/// Default NDN repo root, identical on both ends of the sync.
pub const DEFAULT_REPO_ROOT: &str = "/var/lib/ndn/repo/";

#[derive(Debug, Clone)]
pub struct RepoConfig {
    /// Repository root on both hosts.
    pub root: PathBuf,

    /// Copy program invoked for the mirror step.
    pub rsync_program: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self::with_root(DEFAULT_REPO_ROOT)
    }
}

impl RepoConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        RepoConfig {
            root: root.into(),
            rsync_program: "rsync".to_string(),
        }
    }

    /// Directory holding per-object manifests under the repo root.
    pub fn manifest_dir(&self) -> PathBuf {
        self.root.join("manifest")
    }

    /// Full path of the manifest for a hashed object name.
    pub fn manifest_path(&self, hashid: &str) -> PathBuf {
        self.manifest_dir().join(hashid)
    }

    /// Repo root as a string with exactly one trailing slash, as rsync expects
    /// when mirroring directory contents.
    pub fn root_with_slash(&self) -> String {
        let mut s = self.root.to_string_lossy().into_owned();
        while s.ends_with('/') && s.len() > 1 {
            s.pop();
        }
        if !s.ends_with('/') {
            s.push('/');
        }
        s
    }
}
