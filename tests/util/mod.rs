#![allow(dead_code)]
/// Re-export some common utilities for system tests
pub use assert_cmd::prelude::*; // Add methods on commands
pub use assert_fs::prelude::*;
pub use predicate::str::is_match;
pub use predicates::prelude::*; // Used for writing assertions
pub use std::process::Command; // Run programs

/// Path to test files : tests/test-data/
/// Files
pub const FILE_10_EVENTS: &str = "tests/test-data/10_events.jsonl";

/// Report patterns of the counters and vertex classes in [FILE_10_EVENTS]
pub const REPORT_10_EVENTS: [&str; 12] = [
    "Events read.*10",
    "Events classified.*8.*80.0 %",
    "Events skipped.*2",
    r"kAny\b.*7.*5.*2",
    r"kINT7\b.*5.*4.*1",
    r"kCentral\b.*3.*2.*1",
    r"kSemiCentral\b.*2.*0.*0",
    r"None\s+2",
    r"TPC\s+2",
    r"SPD-Z\s+1",
    r"SPD-3D\s+1",
    r"Track\s+2",
];

/// Helper function to match the raw output of stderr or stdout, with a pattern a fixed amount of times, case insensitive
pub fn match_on_out_no_case(
    byte_output: &[u8],
    re_str: &str,
    match_count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    // Build regex pattern
    let re = fancy_regex::Regex::new(&("(?i)".to_owned() + re_str)).unwrap();
    // Make the predicate function
    let pred_regex = predicate::function(|&x| re.find_iter(x).count() == match_count);
    // Convert the output to string as utf-8
    let str_res = std::str::from_utf8(byte_output).expect("invalid utf-8 sequence");
    // Evaluate the output with the predicate
    assert!(
        pred_regex.eval(&str_res),
        "regex: {re_str} - expected match count: {match_count}\noutput:\n{str_res}",
    );
    Ok(())
}

/// Helper function takes in the output of stderr and asserts that there are no errors or warnings
pub fn assert_no_errors_or_warn(stderr_byte_output: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    match_on_out_no_case(stderr_byte_output, "error - ", 0)?;
    match_on_out_no_case(stderr_byte_output, "warn - ", 0)?;
    Ok(())
}

/// Helper function that asserts the report of [FILE_10_EVENTS] (or a run with the same events) is in the output
pub fn assert_report_10_events(stdout_byte_output: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    for pattern in REPORT_10_EVENTS {
        match_on_out_no_case(stdout_byte_output, pattern, 1)?;
    }
    Ok(())
}
