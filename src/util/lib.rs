//! Miscellaneous utility functions

use crate::config::prelude::*;
use crate::config::Cfg;
use std::sync::{atomic::AtomicBool, Arc};

/// Start the [stderrlog] instance, and immediately use it to log the configured run mode.
pub fn init_error_logger(cfg: &Cfg) {
    stderrlog::new()
        .module("evcount")
        .verbosity(cfg.verbosity() as usize)
        .init()
        .expect("Failed to initialize logger");
    match cfg.stats_output_mode() {
        DataOutputMode::Stdout => log::trace!("Stats ouput set to stdout"),
        DataOutputMode::File(path) => log::trace!("Stats ouput set to file: {}", path.display()),
        DataOutputMode::None => log::trace!("Stats output disabled"),
    }
    log::trace!("Starting evcount with args: {cfg:#?}");
    log::trace!("View enabled: {:#?}", cfg.view());
    log::trace!("Merge inputs: {:#?}", cfg.merge_stats_files());
}

/// Initializes the Ctrl+C handler to facilitate graceful shutdown on Ctrl+C
///
/// Also handles SIGTERM and SIGHUP if the `termination` feature is enabled
pub fn init_ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    // Handles SIGINT, SIGTERM and SIGHUP (as the `termination` feature is  enabled)
    ctrlc::set_handler({
        let mut stop_sig_count = 0;
        move || {
            log::warn!(
                "Stop Ctrl+C, SIGTERM, or SIGHUP received, stopping gracefully, please wait..."
            );
            stop_flag.store(true, std::sync::atomic::Ordering::SeqCst);
            stop_sig_count += 1;
            if stop_sig_count > 1 {
                log::warn!("Second stop signal received, ungraceful shutdown.");
                std::process::exit(1);
            }
        }
    })
    .expect("Error setting Ctrl-C handler");
}

/// Exits the program with the appropriate exit code
///
/// A fatal error during processing exits with 1, even if the processing threads finished without errors.
pub fn exit(
    exit_code: u8,
    fatal_error: bool,
    any_errors_flag: &AtomicBool,
) -> std::process::ExitCode {
    if exit_code == 0 && fatal_error {
        log::debug!("Processing ended with a fatal error");
        std::process::ExitCode::from(1)
    } else if exit_code == 0 {
        log::debug!("Exit successful from event processing");
        match Cfg::global().any_errors_exit_code() {
            Some(code) if any_errors_flag.load(std::sync::atomic::Ordering::Relaxed) => {
                std::process::ExitCode::from(code)
            }
            _ => std::process::ExitCode::SUCCESS,
        }
    } else {
        std::process::ExitCode::from(exit_code)
    }
}
