use crate::domain::ports::PasswordHasher;
use sha2::{Digest, Sha256};

/// Unsalted SHA-256, lowercase hex. Matches the digests already stored in
/// existing `users.csv` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}
