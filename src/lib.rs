//! # wg_vanity
//!
//! Parallel WireGuard vanity public key generator.
//!
//! ## Architecture
//!
//! - `crypto`: Keypair type, generator trait and X25519 key generation
//! - `matcher`: Case-insensitive prefix and substring matching
//! - `worker`: Worker threads and pool management
//! - `search`: First-match coordination and periodic progress reports
//! - `stats`: Attempt counters and throughput
//! - `output`: Key file persistence
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod output;
pub mod search;
pub mod stats;
pub mod worker;

pub use config::Config;
pub use crypto::{GenerateError, Keypair, KeypairGenerator, WireGuardGenerator};
pub use matcher::{Matcher, Pattern, PatternType};
pub use output::{save_keypair, OutputError, SavedKeys};
pub use search::{Coordinator, SearchError, SearchOutcome};
pub use stats::{StatsReporter, StatsSnapshot};
pub use worker::{VanityResult, WorkerPool};
