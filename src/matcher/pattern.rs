//! Pattern matching implementation.

use std::str::FromStr;

use crate::crypto::Keypair;

/// Number of significant base64 characters in an encoded 32-byte key.
///
/// The 44th character is always the `=` padding.
pub const KEY_BODY_LEN: usize = 43;

/// Decides whether a candidate keypair is the one being searched for.
///
/// Implementations are shared read-only by every worker and must be pure.
pub trait Matcher: Send + Sync {
    /// Returns true if the keypair satisfies this matcher.
    fn matches(&self, keypair: &Keypair) -> bool;
}

/// The type of pattern matching to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternType {
    /// Match at the beginning of the public key
    #[default]
    Prefix,
    /// Match anywhere in the public key
    Contains,
}

impl FromStr for PatternType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefix" | "start" | "begin" => Ok(PatternType::Prefix),
            "contains" | "anywhere" | "any" => Ok(PatternType::Contains),
            _ => Err(format!("Unknown pattern type: {}", s)),
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternType::Prefix => write!(f, "prefix"),
            PatternType::Contains => write!(f, "contains"),
        }
    }
}

/// A case-insensitive pattern over the public key encoding.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The pattern string, lowercased once at construction
    pattern: String,
    /// The pattern type
    pattern_type: PatternType,
}

impl Pattern {
    /// Creates a new pattern.
    pub fn new(pattern: impl Into<String>, pattern_type: PatternType) -> Self {
        Self {
            pattern: pattern.into().to_lowercase(),
            pattern_type,
        }
    }

    /// Creates a prefix pattern.
    pub fn prefix(pattern: impl Into<String>) -> Self {
        Self::new(pattern, PatternType::Prefix)
    }

    /// Creates a contains pattern.
    pub fn contains(pattern: impl Into<String>) -> Self {
        Self::new(pattern, PatternType::Contains)
    }

    /// Returns the normalized pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the pattern type.
    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    /// Matches a raw public key encoding against this pattern.
    #[inline]
    pub fn matches_key(&self, public_key: &str) -> bool {
        let key = public_key.to_lowercase();

        match self.pattern_type {
            PatternType::Prefix => key.starts_with(&self.pattern),
            PatternType::Contains => key.contains(&self.pattern),
        }
    }

    /// Returns the expected number of attempts before a match.
    ///
    /// Lowercasing folds the 64-symbol base64 alphabet: a letter is hit by 2
    /// of the 64 symbols, a digit, `+` or `/` by exactly 1.
    pub fn estimated_attempts(&self) -> f64 {
        let per_position: f64 = self
            .pattern
            .chars()
            .map(|c| if c.is_ascii_alphabetic() { 32.0 } else { 64.0 })
            .product();

        match self.pattern_type {
            PatternType::Prefix => per_position,
            PatternType::Contains => {
                let positions = KEY_BODY_LEN.saturating_sub(self.pattern.chars().count()) + 1;
                (per_position / positions as f64).max(1.0)
            }
        }
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let attempts = self.estimated_attempts();
        if attempts <= 1e3 {
            "Very Easy (< 1 second)".into()
        } else if attempts <= 1e5 {
            "Easy (seconds)".into()
        } else if attempts <= 1e7 {
            "Medium (minutes)".into()
        } else if attempts <= 1e9 {
            "Hard (hours)".into()
        } else {
            "Very Hard (days or more)".into()
        }
    }
}

impl Matcher for Pattern {
    #[inline]
    fn matches(&self, keypair: &Keypair) -> bool {
        self.matches_key(keypair.public_key())
    }
}
