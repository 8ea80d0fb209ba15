//! SHA-256 content fingerprints for drift detection.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of migration source content.
///
/// Lowercase hex SHA-256 of the raw bytes. No normalization is applied, so
/// any edit to the content (whitespace included) yields a new fingerprint.
pub fn fingerprint(content: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_ref());
    let result = hasher.finalize();
    format!("{:x}", result)
}
