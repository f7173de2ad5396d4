//! Runtime configuration for the vanity key generator.

use std::path::PathBuf;
use std::time::Duration;

use crate::matcher::{PatternType, KEY_BODY_LEN};
use clap::Parser;

/// WireGuard Vanity Key Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// String to search for in the public key (case insensitive, base64 characters only)
    #[arg(value_name = "FIND")]
    pub find: String,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Match mode: prefix or contains
    #[arg(short = 'm', long = "mode", default_value = "prefix")]
    pub pattern_type: PatternType,

    /// Directory the key files are written to
    #[arg(short = 'o', long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "2")]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }

    /// Returns the progress report interval.
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pattern = self.normalized_find();

        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern("Pattern cannot be empty".into()));
        }

        // Lowercasing folds letters, so only a-z survive from the base64 alphabet.
        if !pattern
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+' || c == '/')
        {
            return Err(ConfigError::InvalidPattern(
                "Pattern must contain only base64 characters (a-z, 0-9, +, /)".into(),
            ));
        }

        if pattern.len() > KEY_BODY_LEN {
            return Err(ConfigError::InvalidPattern(format!(
                "Pattern cannot be longer than {} characters (full key)",
                KEY_BODY_LEN
            )));
        }

        if self.threads == Some(0) {
            return Err(ConfigError::InvalidThreads);
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(())
    }

    /// Returns the lowercased search string
    pub fn normalized_find(&self) -> String {
        self.find.to_lowercase()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Thread count must be at least 1")]
    InvalidThreads,

    #[error("Report interval must be at least 1 second")]
    InvalidInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(find: &str) -> Config {
        Config {
            find: find.into(),
            threads: None,
            pattern_type: PatternType::Prefix,
            out_dir: PathBuf::from("."),
            report_interval: 2,
        }
    }

    #[test]
    fn test_valid_pattern() {
        assert!(make_test_config("WG+vpn/1").validate().is_ok());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(make_test_config("wg-vpn").validate().is_err());
        assert!(make_test_config("").validate().is_err());
        assert!(make_test_config("abc=").validate().is_err());
    }

    #[test]
    fn test_pattern_too_long() {
        assert!(make_test_config(&"a".repeat(43)).validate().is_ok());
        assert!(make_test_config(&"a".repeat(44)).validate().is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let mut config = make_test_config("abc");
        config.threads = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreads)));

        config.threads = Some(3);
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = make_test_config("abc");
        config.report_interval = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidInterval)));
    }

    #[test]
    fn test_cli_parsing() {
        let config =
            Config::try_parse_from(["wg_vanity", "Home", "--threads", "4", "-m", "contains"])
                .unwrap();
        assert_eq!(config.find, "Home");
        assert_eq!(config.worker_count(), 4);
        assert_eq!(config.pattern_type, PatternType::Contains);
        assert_eq!(config.report_interval(), Duration::from_secs(2));
        assert_eq!(config.out_dir, PathBuf::from("."));
    }

    #[test]
    fn test_cli_requires_find() {
        assert!(Config::try_parse_from(["wg_vanity"]).is_err());
    }
}
