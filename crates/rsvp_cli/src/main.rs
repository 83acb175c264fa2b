//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `rsvp_core` linkage and schema bootstrap without a host ledger.
//! - Keep output deterministic for quick local sanity checks.

use rsvp_core::db::migrations::{applied_version, latest_version};
use rsvp_core::db::open_db_in_memory;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("rsvp_core ping={}", rsvp_core::ping());
    println!("rsvp_core version={}", rsvp_core::core_version());
    println!(
        "rsvp_core db_path={}",
        rsvp_core::config::resolve_db_path().display()
    );
    println!(
        "rsvp_core log_level={}",
        rsvp_core::config::resolve_log_level()
    );

    // Bootstraps a throwaway store so migration failures surface here.
    match open_db_in_memory().and_then(|conn| applied_version(&conn)) {
        Ok(version) => {
            println!("rsvp_core schema={version}/{}", latest_version());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("rsvp_core schema bootstrap failed: {err}");
            ExitCode::FAILURE
        }
    }
}
