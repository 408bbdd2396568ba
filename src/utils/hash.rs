use sha1::{Digest, Sha1};

/// Compute the manifest filename for an object name: the lowercase hex SHA-1
/// digest of its UTF-8 bytes.
#[must_use]
pub fn manifest_id(name: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(name.as_bytes());
    hex::encode(hasher.finalize())
}
