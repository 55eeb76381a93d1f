//! Run identifiers and content digests.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generates a time-ordered (v7) identifier for a pipeline run.
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::now_v7()
}

/// Returns the lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes.as_ref());
    hex::encode(hasher.finalize())
}
