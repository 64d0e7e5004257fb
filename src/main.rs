//! qubic_build - master build for the QuBIc imaging modules.
//!
//! Updates module checkouts, builds them with make or setup.py and assembles
//! versioned, platform-tagged release bundles.

use qubic_build::cli;
use std::process;

#[tokio::main]
async fn main() {
    let args = cli::parse_args();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    // Run CLI and get exit code
    let exit_code = match cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
