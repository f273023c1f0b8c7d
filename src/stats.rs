//! All stat collecting functionality.
//!
//! Analysis sends [StatType]s to the [Controller](crate::controller::Controller), which records them in a [StatsCollector].
//! The collected counters can be written to a JSON/TOML file, read back with [read_stats_file], and merged with [merge_stats_files].

pub mod histogram;
pub(crate) mod stat_format_utils;
pub mod stats_collector;
pub mod stats_report;
pub mod stats_validation;

use crate::util::*;

/// Possible stats that can be sent to the [Controller](crate::controller::Controller).
#[derive(Debug, Clone, PartialEq)]
pub enum StatType {
    /// Fatal error, stop processing.
    Fatal(Box<str>),
    /// Non-fatal error, reported but processing continues.
    Error(Box<str>),
    /// Non-fatal anomaly in an event that is still counted.
    Warning(Box<str>),
    /// An input entry was scanned, whether it could be classified or not.
    EventSeen,
    /// An event was classified.
    Observation(Observation),
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Fatal(e) => write!(f, "Fatal error: {e}"),
            StatType::Error(e) => write!(f, "Error: {e}"),
            StatType::Warning(w) => write!(f, "Warning: {w}"),
            StatType::EventSeen => write!(f, "Event seen"),
            StatType::Observation(obs) => write!(
                f,
                "Observation: triggers={triggers} vertex={vertex} centrality={centrality}",
                triggers = obs.triggers,
                vertex = obs.vertex_class,
                centrality = obs.centrality
            ),
        }
    }
}

/// Read stats previously written with `--output-stats`. The file extension determines the format (JSON/TOML).
pub fn read_stats_file(path: &Path) -> Result<StatsCollector, String> {
    let format = DataOutputFormat::from_path(path).ok_or_else(|| {
        format!(
            "Invalid stats file extension: {}, must be .json or .toml",
            path.display()
        )
    })?;
    let stats_str = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read stats file {}: {e}", path.display()))?;
    match format {
        DataOutputFormat::JSON => serde_json::from_str(&stats_str)
            .map_err(|e| format!("Failed to deserialize stats file {}: {e}", path.display())),
        DataOutputFormat::TOML => toml::from_str(&stats_str)
            .map_err(|e| format!("Failed to deserialize stats file {}: {e}", path.display())),
    }
}

/// Read and merge stats files into one [StatsCollector].
///
/// Fails on the first file that cannot be read or whose counters have a different binning.
pub fn merge_stats_files(paths: &[PathBuf]) -> Result<StatsCollector, String> {
    let mut merged = StatsCollector::default();
    for path in paths {
        log::debug!("Merging stats from {}", path.display());
        let stats = read_stats_file(path)?;
        merged
            .merge(&stats)
            .map_err(|e| format!("Cannot merge {}: {e}", path.display()))?;
    }
    Ok(merged)
}
