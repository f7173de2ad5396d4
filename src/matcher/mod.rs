//! Pattern matching for WireGuard public keys.
//!
//! Supports two case-insensitive matching strategies:
//! - Prefix: Match at the start of the public key
//! - Contains: Match anywhere in the public key

mod pattern;

pub use pattern::{Matcher, Pattern, PatternType, KEY_BODY_LEN};
