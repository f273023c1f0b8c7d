#![warn(unused_extern_crates)]
#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
// Readability lints
#![warn(
    clippy::option_filter_map,
    clippy::manual_filter_map,
    clippy::if_not_else,
    clippy::nonminimal_bool,
    clippy::single_match_else,
    clippy::range_plus_one,
    clippy::int_plus_one,
    clippy::needless_range_loop,
    clippy::needless_continue,
    clippy::shadow_same,
    clippy::shadow_unrelated
)]
// Performance lints
#![warn(variant_size_differences)]
#![warn(
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,
    clippy::mutex_integer,
    clippy::mem_forget,
    clippy::maybe_infinite_iter
)]
// Safety lints
#![warn(unused_results)]
#![warn(unused_import_braces)]
#![warn(trivial_casts, trivial_numeric_casts)]
// Unhandled results (allow unwrap and expect as there are many cases where the unwrap is totally safe)
#![warn(clippy::map_unwrap_or)]

//! Event counter for ALICE (evcount), for counting events per trigger class after physics selection and vertex requirements
//!
//! Input is one event per line as JSON (`null` for a missing event).
//! Each event is classified by its trigger mask, its vertex and its centrality, and counted in six histograms:
//! `PhysSel`, `SPDVert` and `TrackVert`, each per trigger class and per trigger class vs. centrality.
//!
//! # Usage
//!
//! ## Counting events from a file and printing the report
//! ```shell
//! $ evcount <input_file>
//! ```
//!
//! ## Reading events from stdin and using another centrality estimator
//! ```shell
//! $ cat <input_file> | evcount --estimator CL1
//! ```
//!
//! ## Printing the classification of each event
//! ```shell
//! $ evcount <input_file> view events
//! ```
//!
//! ## Writing the collected counters to a file and verifying a later run against them
//! ```shell
//! $ evcount <input_file> --stats-format json --output-stats counters.json
//! $ evcount <input_file> --input-stats-file counters.json
//! ```
//!
//! ## Merging the counters of run segments processed separately
//! ```shell
//! $ evcount merge segment_1.json segment_2.toml
//! ```

use crate::util::*;

/// Write an error message to stderr.
/// All error messages should be written through this function to ensure consistency.
#[inline]
pub fn display_error(err_msg: &str) {
    log::error!("{}", owo_colors::OwoColorize::red(&err_msg));
}

pub mod analyze;
pub mod classify;
pub mod config;
pub mod controller;
pub mod event;
pub mod init;
pub mod input;
pub mod stats;
pub mod util;

/// Does the initial setup for input event processing
///
/// Follows these steps:
/// 1. Launch the reader thread that scans the input into batches of events with [input::spawn_reader].
/// 2. Launch the analysis thread that classifies the events with [analyze::spawn_analysis].
/// 3. Wait for both to finish.
#[allow(clippy::needless_pass_by_value)] // The reader is moved into the reader thread
pub fn init_processing(
    config: &'static impl Config,
    reader: Box<dyn BufRead + Send>,
    stat_send: flume::Sender<StatType>,
    stop_flag: Arc<atomic::AtomicBool>,
) -> io::Result<()> {
    let scanner = input::EventScanner::new(reader);

    // 1. Launch reader thread to read events from file or stdin
    let (reader_handle, reader_data_recv): (
        thread::JoinHandle<()>,
        crossbeam_channel::Receiver<EventBatch>,
    ) = input::spawn_reader(stop_flag.clone(), scanner, stat_send.clone());

    // 2. Launch analysis thread
    let analysis_handle =
        analyze::spawn_analysis(config, stop_flag, stat_send, reader_data_recv)?;

    reader_handle.join().expect("Error joining reader thread");

    if let Err(e) = analysis_handle.join() {
        log::error!("Analysis thread terminated early: {:#?}\n", e);
    }
    Ok(())
}
