//! SSH session and SFTP file transfer.
//!
//! A [`RemoteSession`] owns the TCP connection, the SSH session and the SFTP
//! channel; dropping it closes everything, so cleanup happens on every exit
//! path. Host keys are verified against `~/.ssh/known_hosts` before
//! authentication — unknown keys are rejected unless the caller opted into
//! recording them.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};

use ssh2::{CheckResult, KnownHostFileKind, RenameFlags, Session};

use crate::utils::errors::{CopyError, Result};

const SSH_PORT: u16 = 22;

/// What to do with a host key that known_hosts cannot vouch for.
/// A key that *mismatches* a recorded entry is always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Reject hosts absent from known_hosts.
    KnownHosts,
    /// Record previously unknown keys in known_hosts and proceed.
    AcceptNew,
}

pub struct RemoteSession {
    sess: Session,
    sftp: ssh2::Sftp,
}

impl RemoteSession {
    /// Connect to `host:22`, verify its key under `policy`, and authenticate
    /// `user` via the local SSH agent.
    pub fn connect(host: &str, user: &str, policy: HostKeyPolicy) -> Result<Self> {
        tracing::debug!(host, user, "Opening SSH connection");
        let tcp = TcpStream::connect((host, SSH_PORT))?;
        let mut sess = Session::new()?;
        sess.set_tcp_stream(tcp);
        sess.handshake()?;

        verify_host_key(&sess, host, policy)?;

        sess.userauth_agent(user)
            .map_err(|e| CopyError::Authentication(format!("agent auth for {user}@{host}: {e}")))?;
        if !sess.authenticated() {
            return Err(CopyError::Authentication(format!(
                "agent offered no usable key for {user}@{host}"
            )));
        }

        let sftp = sess.sftp()?;
        tracing::debug!(host, "SFTP channel open");
        Ok(RemoteSession { sess, sftp })
    }

    /// Read the full contents of a remote file.
    pub fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let mut file = self.sftp.open(path).map_err(|source| CopyError::RemoteOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Write a remote file by writing a sibling temporary file and renaming it
    /// over the target, so a failure mid-write cannot leave the target
    /// truncated.
    pub fn write_file_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        let tmp = sibling_tmp_path(path);
        {
            let mut file = self.sftp.create(&tmp)?;
            file.write_all(data)?;
        }
        if let Err(source) = self.sftp.rename(
            &tmp,
            path,
            Some(RenameFlags::OVERWRITE | RenameFlags::ATOMIC | RenameFlags::NATIVE),
        ) {
            let _ = self.sftp.unlink(&tmp);
            return Err(source.into());
        }
        Ok(())
    }

    /// Best-effort orderly shutdown; `Drop` covers error paths.
    pub fn disconnect(self) -> Result<()> {
        self.sess.disconnect(None, "done", None)?;
        Ok(())
    }
}

fn verify_host_key(sess: &Session, host: &str, policy: HostKeyPolicy) -> Result<()> {
    let mut known_hosts = sess.known_hosts()?;
    let file = known_hosts_file();
    if let Some(path) = file.as_deref().filter(|p| p.exists()) {
        known_hosts.read_file(path, KnownHostFileKind::OpenSSH)?;
    }

    let (key, key_type) = sess
        .host_key()
        .ok_or_else(|| CopyError::Authentication(format!("no host key offered by {host}")))?;

    match known_hosts.check_port(host, SSH_PORT, key) {
        CheckResult::Match => Ok(()),
        CheckResult::Mismatch => Err(CopyError::HostKeyMismatch {
            host: host.to_string(),
        }),
        CheckResult::Failure => Err(CopyError::Authentication(format!(
            "host key check failed for {host}"
        ))),
        CheckResult::NotFound => match policy {
            HostKeyPolicy::AcceptNew => {
                tracing::warn!(host, "Recording previously unknown host key");
                known_hosts.add(host, key, "added by ndncopyfile", key_type.into())?;
                if let Some(path) = &file {
                    if let Some(dir) = path.parent() {
                        std::fs::create_dir_all(dir)?;
                    }
                    known_hosts.write_file(path, KnownHostFileKind::OpenSSH)?;
                }
                Ok(())
            }
            HostKeyPolicy::KnownHosts => Err(CopyError::UnknownHostKey {
                host: host.to_string(),
            }),
        },
    }
}

fn known_hosts_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".ssh").join("known_hosts"))
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "manifest".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_path_stays_in_same_directory() {
        let tmp = sibling_tmp_path(Path::new("/var/lib/ndn/repo/manifest/abc123"));
        assert_eq!(tmp.parent(), Some(Path::new("/var/lib/ndn/repo/manifest")));
        let name = tmp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".abc123."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_tmp_path_differs_from_target() {
        let target = Path::new("/repo/manifest/x");
        assert_ne!(sibling_tmp_path(target), target);
    }
}
