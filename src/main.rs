//! WireGuard Vanity Key Generator CLI
//!
//! Usage:
//!   wg_vanity home                  # Find a public key starting with "home"
//!   wg_vanity -m contains vpn       # Find a public key containing "vpn"
//!   wg_vanity -t 8 -o /etc/wg home  # 8 threads, write keys to /etc/wg

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use wg_vanity::stats::format_number;
use wg_vanity::{save_keypair, Config, Coordinator, Pattern, SearchOutcome, WireGuardGenerator};

fn main() {
    let config = Config::parse();
    init_tracing();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let pattern = Pattern::new(config.normalized_find(), config.pattern_type);
    let coordinator =
        Coordinator::new(config.worker_count()).with_report_interval(config.report_interval());

    // Print startup info
    println!("WireGuard Vanity Key Generator");
    println!("==============================");
    println!("Pattern:    {} ({})", pattern.pattern(), pattern.pattern_type());
    println!("Difficulty: {}", pattern.difficulty_description());
    println!("Workers:    {}", coordinator.num_workers());
    println!("Output:     {}", config.out_dir.display());
    println!();

    ctrlc_handler(coordinator.stop_flag());

    println!("Searching... (Press Ctrl+C to stop)\n");

    let outcome = match coordinator.run(WireGuardGenerator::new(), pattern) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    print_result(&outcome);

    if let Err(e) = save_keypair(&outcome.result.keypair, &config.out_dir, &config.find) {
        error!("{}", e);
        // Never lose a finished search
        println!("Private Key: {}", outcome.result.keypair.private_key());
        process::exit(1);
    }
}

fn print_result(outcome: &SearchOutcome) {
    let result = &outcome.result;
    println!();
    println!("=== Match ===");
    println!("Public Key:  {}", result.keypair.public_key());
    println!("Worker:      {}", result.worker_id);
    println!(
        "Tested:      {} keys in {:.2}s ({:.2} kKeys/s)",
        format_number(outcome.stats.total_attempts),
        outcome.stats.elapsed.as_secs_f64(),
        outcome.stats.kilo_keys_per_second()
    );
    println!();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    }) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }
}
