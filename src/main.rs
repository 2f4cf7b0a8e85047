//! RCC - run C++ snippets from the command line
//!
//! Wraps a snippet in a boilerplate program, compiles it with g++ or clang++,
//! runs it, and caches the binary so identical snippets never recompile.

mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Instant;

use cli::Cli;
use rcc_core::error::ExitCode as RccExitCode;
use rcc_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    // Usage errors exit with 2 from clap itself
    let cli = Cli::parse_with_program_args();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    install_interrupt_handler();

    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(RccExitCode::Failure as u8)),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Exit on Ctrl-C; a running compiler or program receives the signal itself
fn install_interrupt_handler() {
    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("Control-C detected, exiting...");
        std::process::exit(RccExitCode::Failure as i32);
    }) {
        tracing::debug!(error = %e, "failed to install interrupt handler");
    }
}
