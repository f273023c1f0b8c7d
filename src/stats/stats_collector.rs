//! Contains the [StatsCollector] that collects stats from analysis.
pub mod error_stats;
pub mod event_counters;

use super::stats_validation::validate_custom_stats;
use crate::util::*;
use error_stats::ErrorStats;
use event_counters::EventCounters;

/// Collects stats from analysis.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsCollector {
    is_finalized: bool,
    events_seen: u64,
    events_classified: u64,
    defaulted_centrality: u64,
    vertex_classes: [u64; VertexClass::COUNT],
    counters: EventCounters,
    error_stats: ErrorStats,
}

impl StatsCollector {
    /// Record a stat.
    pub fn collect(&mut self, stat: StatType) {
        match stat {
            StatType::Fatal(m) => self.error_stats.add_fatal_err(m),
            StatType::Error(m) => self.error_stats.add_err(m),
            StatType::Warning(m) => self.error_stats.add_warning(&m),
            StatType::EventSeen => self.events_seen += 1,
            StatType::Observation(obs) => self.record_observation(&obs),
        }
    }

    fn record_observation(&mut self, observation: &Observation) {
        self.events_classified += 1;
        if observation.centrality.is_defaulted() {
            self.defaulted_centrality += 1;
        }
        self.vertex_classes[observation.vertex_class.code() as usize] += 1;
        self.counters.record_observation(observation);
    }

    pub(crate) fn validate_custom_stats(&mut self, custom_checks: &impl CustomChecksOpt) {
        if let Err(e) = validate_custom_stats(custom_checks, self) {
            e.into_iter().for_each(|error_msg| {
                self.error_stats.add_custom_check_error(error_msg);
            });
            // Error codes have to be extracted again
            self.is_finalized = false;
        }
    }

    /// Finalize stats collection. Meaning no more stats can be collected.
    ///
    /// Does post-processing on the stats collected which assumes that no more stats are collected.
    /// Does nothing if already finalized.
    pub fn finalize(&mut self, mute_errors: bool) {
        if self.is_finalized {
            return;
        }
        self.error_stats.finalize_stats(mute_errors);
        self.is_finalized = true;
    }

    /// Add the stats collected in another run.
    ///
    /// Fails if the counters of the other run have a different binning.
    pub fn merge(&mut self, other: &Self) -> Result<(), String> {
        self.counters.merge(&other.counters)?;
        self.events_seen += other.events_seen;
        self.events_classified += other.events_classified;
        self.defaulted_centrality += other.defaulted_centrality;
        self.vertex_classes
            .iter_mut()
            .zip(other.vertex_classes)
            .for_each(|(count, other_count)| *count += other_count);
        self.error_stats.merge(&other.error_stats);
        self.is_finalized = false;
        Ok(())
    }

    /// Returns the number of input entries seen, including missing and malformed events.
    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    /// Returns the number of events that were classified and counted.
    pub fn events_classified(&self) -> u64 {
        self.events_classified
    }

    /// Returns the number of input entries that were skipped, i.e. missing or malformed.
    pub fn events_skipped(&self) -> u64 {
        self.events_seen.saturating_sub(self.events_classified)
    }

    /// Returns the number of events that got the default centrality.
    pub fn defaulted_centrality(&self) -> u64 {
        self.defaulted_centrality
    }

    /// Returns the number of classified events with the given primary vertex class.
    pub fn vertex_class_count(&self, class: VertexClass) -> u64 {
        self.vertex_classes[class.code() as usize]
    }

    /// Returns a reference to the [EventCounters].
    pub fn counters(&self) -> &EventCounters {
        &self.counters
    }

    /// Returns a reference to the [ErrorStats].
    pub fn error_stats(&self) -> &ErrorStats {
        &self.error_stats
    }

    /// Returns the number of errors reported.
    pub fn err_count(&self) -> u64 {
        self.error_stats.err_count()
    }

    /// Returns the number of warnings reported.
    pub fn warn_count(&self) -> u64 {
        self.error_stats.warn_count()
    }

    /// Return if any errors were reported.
    pub fn any_errors(&self) -> bool {
        self.error_stats.err_count() > 0
    }

    /// Returns if any fatal errors were reported.
    pub fn any_fatal_err(&self) -> bool {
        self.error_stats.any_fatal_err()
    }

    /// Takes the reported fatal error.
    pub fn take_fatal_err(&mut self) -> Option<Box<str>> {
        self.error_stats.take_fatal_err()
    }

    /// Returns a slice of the unique error codes of reported errors.
    pub fn unique_error_codes_as_slice(&self) -> &[String] {
        self.error_stats.unique_error_codes_as_slice()
    }

    /// Returns a slice of the unique warning codes of reported warnings.
    pub fn unique_warning_codes_as_slice(&self) -> &[String] {
        self.error_stats.unique_warning_codes_as_slice()
    }

    /// Serialize the stats in the given format.
    pub fn to_string_format(&self, format: DataOutputFormat) -> Result<String, String> {
        match format {
            DataOutputFormat::JSON => serde_json::to_string_pretty(&self)
                .map_err(|e| format!("Failed to serialize stats to JSON: {e}")),
            DataOutputFormat::TOML => toml::to_string_pretty(&self)
                .map_err(|e| format!("Failed to serialize stats to TOML: {e}")),
        }
    }

    pub(crate) fn write_stats(
        &self,
        mode: &DataOutputMode,
        format: DataOutputFormat,
    ) -> Result<(), String> {
        if *mode == DataOutputMode::None {
            return Ok(());
        }
        write_stats_str(mode, &self.to_string_format(format)?)
    }

    /// Compare the collected stats with stats from another run, e.g. read from a stats file.
    ///
    /// Each mismatch is displayed as an error unless errors are muted.
    pub fn validate_other_stats(&self, other: &Self, mute_errors: bool) -> Result<(), Vec<String>> {
        let mut errs: Vec<String> = Vec::new();

        if let Err(mut sub_errs) = self.counters.validate_other(&other.counters) {
            errs.append(&mut sub_errs);
        }
        if let Err(mut sub_errs) = self.error_stats.validate_other(&other.error_stats) {
            errs.append(&mut sub_errs);
        }

        // This syntax is used to ensure that a compile error is raised if a
        // new field is added to the struct but not added to the validation here
        let other_top_fields_only = Self {
            is_finalized: self.is_finalized,
            events_seen: other.events_seen,
            events_classified: other.events_classified,
            defaulted_centrality: other.defaulted_centrality,
            vertex_classes: other.vertex_classes,
            counters: EventCounters::default(), // Validated separately
            error_stats: ErrorStats::default(), // Validated separately
        };
        if let Err(mut top_field_errs) = self.validate_fields(&other_top_fields_only) {
            errs.append(&mut top_field_errs);
        }

        if errs.is_empty() {
            Ok(())
        } else {
            if !mute_errors {
                errs.iter().for_each(|e| crate::display_error(e));
            }
            Err(errs)
        }
    }

    crate::validate_fields!(
        StatsCollector,
        events_seen,
        events_classified,
        defaulted_centrality,
        vertex_classes
    );
}

fn write_stats_str(mode: &DataOutputMode, stats_str: &str) -> Result<(), String> {
    match mode {
        DataOutputMode::File(path) => fs::write(path, stats_str)
            .map_err(|e| format!("Failed writing stats output file {}: {e}", path.display())),
        DataOutputMode::Stdout => {
            println!("{stats_str}");
            Ok(())
        }
        DataOutputMode::None => Ok(()),
    }
}
