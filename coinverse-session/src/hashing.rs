use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Digest applied to passwords before they leave the device. The server
/// compares digests, so every client must use the same one.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &SecretString) -> String;
}

/// Lowercase hex SHA-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, password: &SecretString) -> String {
        hex::encode(Sha256::digest(password.expose_secret().as_bytes()))
    }
}
