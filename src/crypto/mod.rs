//! Keypair generation for WireGuard vanity keys.
//!
//! This module provides:
//! - The `Keypair` value handed between generator, matcher and persistence
//! - The `KeypairGenerator` seam the workers call into
//! - Curve25519 (X25519) key generation with base64 encoding

mod keypair;
mod wireguard;

pub use keypair::{GenerateError, Keypair, KeypairGenerator};
pub use wireguard::WireGuardGenerator;
