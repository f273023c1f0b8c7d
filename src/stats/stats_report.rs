//! Builds the [Report] printed at the end of a run from the collected stats.
pub mod report;
mod table_formatter_utils;

use self::report::CounterSummary;
use super::stat_format_utils::{format_count, format_error_codes, format_fraction};
use crate::classify::DEFAULT_CENTRALITY;
use crate::util::*;

/// Helper function that makes the report
pub fn make_report(
    processing_time: Duration,
    stats_collector: &mut StatsCollector,
    estimator: &str,
) -> Report {
    stats_collector.finalize(true);

    let mut report = Report::new(processing_time);

    if let Some(fatal_err) = stats_collector.take_fatal_err() {
        report.add_fatal_error(fatal_err.into_string());
    }

    add_global_stats_to_report(&mut report, stats_collector, estimator);
    add_counters_to_report(&mut report, stats_collector.counters());
    add_vertex_classes_to_report(&mut report, stats_collector);

    report
}

/// Helper function that adds the global stats to the report
fn add_global_stats_to_report(report: &mut Report, stats_collector: &StatsCollector, estimator: &str) {
    if stats_collector.err_count() == 0 {
        report.add_stat(StatSummary::new(
            "Total Errors".green().to_string(),
            stats_collector.err_count().green().to_string(),
            None,
        ));
    } else {
        report.add_stat(StatSummary::new(
            "Total Errors".red().to_string(),
            stats_collector.err_count().red().to_string(),
            Some(format_error_codes(
                stats_collector.unique_error_codes_as_slice(),
            )),
        ));
    }
    if stats_collector.warn_count() > 0 {
        report.add_stat(StatSummary::new(
            "Total Warnings".yellow().to_string(),
            stats_collector.warn_count().yellow().to_string(),
            Some(format_error_codes(
                stats_collector.unique_warning_codes_as_slice(),
            )),
        ));
    }
    report.add_stat(StatSummary::new(
        "Events read".to_string(),
        stats_collector.events_seen().to_string(),
        None,
    ));
    report.add_stat(StatSummary::new(
        "Events classified".to_string(),
        stats_collector.events_classified().to_string(),
        Some(format_fraction(
            stats_collector.events_classified(),
            stats_collector.events_seen(),
        )),
    ));
    if stats_collector.events_skipped() > 0 {
        report.add_stat(StatSummary::new(
            "Events skipped".to_string(),
            stats_collector.events_skipped().to_string(),
            Some("missing or malformed".to_string()),
        ));
    }
    report.add_stat(StatSummary::new(
        "Centrality estimator".to_string(),
        estimator.to_string(),
        (stats_collector.defaulted_centrality() > 0).then(|| {
            format!(
                "{} events without estimate, set to {DEFAULT_CENTRALITY}",
                stats_collector.defaulted_centrality()
            )
        }),
    ));
}

/// Helper function that adds a row per trigger bin with the counts of each counter
fn add_counters_to_report(report: &mut Report, counters: &EventCounters) {
    for bin in TriggerBin::ALL {
        report.add_counters(CounterSummary {
            trigger: bin.to_string(),
            phys_sel: format_count(counters.count(Counter::PhysSel, bin)),
            spd_vert: format_count(counters.count(Counter::SpdVert, bin)),
            track_vert: format_count(counters.count(Counter::TrackVert, bin)),
        });
    }
}

fn add_vertex_classes_to_report(report: &mut Report, stats_collector: &StatsCollector) {
    for class in VertexClass::ALL {
        report.add_vertex_class(
            class.to_string(),
            format_count(stats_collector.vertex_class_count(class)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collected_stats() -> StatsCollector {
        let mut stats = StatsCollector::default();
        let classifier = EventClassifier::default();
        for line in [
            r#"{"trigger_mask":18,"primary_vertex":{"title":"vertexer: Z"},"spd_vertex":{"n_contributors":2},"multiplicity":{"V0M":45.0}}"#,
            r#"{"trigger_mask":2,"primary_vertex":{"title":"VertexerTracks"}}"#,
        ] {
            let event: EventRecord = serde_json::from_str(line).unwrap();
            stats.collect(StatType::EventSeen);
            stats.collect(StatType::Observation(
                classifier.classify(Some(&event)).unwrap(),
            ));
        }
        stats.collect(StatType::EventSeen);
        stats.collect(StatType::Error("line 3: [E11] Missing event, skipped".into()));
        stats.collect(StatType::Warning("line 2: [W20] No V0M multiplicity".into()));
        stats
    }

    #[test]
    fn test_make_report() {
        let mut stats = collected_stats();
        let mut report = make_report(Duration::from_millis(3), &mut stats, "V0M");
        let table = report.format().to_string();

        assert!(table.contains("Events read"));
        assert!(table.contains("Events classified"));
        assert!(table.contains("66.7 %"));
        assert!(table.contains("E11"));
        assert!(table.contains("W20"));
        assert!(table.contains("kSemiCentral"));
        assert!(table.contains("SPD-Z"));
        assert!(table.contains("1 events without estimate"));
    }

    #[test]
    fn test_make_report_fatal() {
        let mut stats = collected_stats();
        stats.collect(StatType::Fatal("stdin not redirected!".into()));
        let mut report = make_report(Duration::from_millis(3), &mut stats, "V0M");
        let table = report.format().to_string();
        assert!(table.contains("FATAL ERROR"));
        assert!(!stats.any_fatal_err());
    }
}
