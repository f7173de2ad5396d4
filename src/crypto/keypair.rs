//! Keypair representation and the generator seam.

use std::fmt;

/// Errors that can occur while generating a keypair.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Entropy source failed: {0}")]
    Entropy(#[from] rand::Error),

    #[error("Key generation failed: {0}")]
    Other(String),
}

/// A public/private keypair, each side as an opaque string encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct Keypair {
    public_key: String,
    private_key: String,
}

impl Keypair {
    /// Creates a keypair from already encoded keys.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Returns the encoded public key.
    #[inline]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Returns the encoded private key.
    #[inline]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Source of fresh random keypairs.
///
/// Implementations are shared by every worker of a pool, so `generate` must be
/// safe to call concurrently. Each call is expected to be expensive relative to
/// a match check.
pub trait KeypairGenerator: Send + Sync {
    /// Generates one independent random keypair.
    fn generate(&self) -> Result<Keypair, GenerateError>;
}
