//! WireGuard (Curve25519) keypair generation.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};

use super::{GenerateError, Keypair, KeypairGenerator};

/// Generates WireGuard keypairs from the operating system's CSPRNG.
///
/// Both keys are 32 bytes encoded as padded standard base64 (44 characters),
/// the format `wg genkey` and `wg pubkey` use.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireGuardGenerator;

impl WireGuardGenerator {
    /// Creates a new generator.
    pub fn new() -> Self {
        Self
    }

    /// Builds a keypair from a known private scalar.
    ///
    /// The scalar is clamped before encoding, so the stored private key is the
    /// same one `wg genkey` would print for these bytes.
    pub fn keypair_from_private(mut private: [u8; 32]) -> Keypair {
        clamp(&mut private);
        let secret = StaticSecret::from(private);
        let public = PublicKey::from(&secret);

        Keypair::new(BASE64.encode(public.as_bytes()), BASE64.encode(secret.to_bytes()))
    }
}

impl KeypairGenerator for WireGuardGenerator {
    #[inline]
    fn generate(&self) -> Result<Keypair, GenerateError> {
        let mut private = [0u8; 32];
        OsRng.try_fill_bytes(&mut private)?;
        Ok(Self::keypair_from_private(private))
    }
}

/// Curve25519 scalar clamping (RFC 7748, section 5).
#[inline]
fn clamp(scalar: &mut [u8; 32]) {
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
}
