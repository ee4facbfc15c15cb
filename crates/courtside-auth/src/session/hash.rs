use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a raw refresh token. Only this is stored.
pub fn hash_token(raw: &str) -> String {
    format!("{:x}", Sha256::digest(raw.as_bytes()))
}
