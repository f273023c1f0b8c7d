//! Validation of collected stats: against the expected counts of the custom checks, and field by field against stats from another run.
use super::stats_collector::StatsCollector;
use crate::util::*;

/// Implements `fn validate_fields(&self, other: &Self) -> Result<(), Vec<String>>` comparing each listed field.
#[macro_export]
macro_rules! validate_fields {
    ($struct_name:ident, $($field:ident),+ $(,)?) => {
        fn validate_fields(&self, other: &Self) -> Result<(), Vec<String>> {
            let mut errs: Vec<String> = Vec::new();
            $(
                if self.$field != other.$field {
                    errs.push(format!(
                        "{struct_name}.{field} mismatch: collected {this:?} != expected {other:?}",
                        struct_name = stringify!($struct_name),
                        field = stringify!($field),
                        this = self.$field,
                        other = other.$field,
                    ));
                }
            )+
            if errs.is_empty() {
                Ok(())
            } else {
                Err(errs)
            }
        }
    };
}

/// Validate the stats against the custom checks configuration.
pub fn validate_custom_stats(
    custom_checks: &impl CustomChecksOpt,
    stats: &StatsCollector,
) -> Result<(), Vec<Box<str>>> {
    let mut errors = Vec::<Box<str>>::new();

    if let Some(expect_events) = custom_checks.events() {
        if stats.events_seen() != expect_events {
            errors.push(
                format!(
                    "[E9001] Expected {expect_events} events, but found {observed}",
                    observed = stats.events_seen()
                )
                .into(),
            );
        }
    }

    let any_bin_checks = [
        (custom_checks.phys_sel_any(), Counter::PhysSel, "E9002"),
        (custom_checks.spd_vert_any(), Counter::SpdVert, "E9003"),
        (custom_checks.track_vert_any(), Counter::TrackVert, "E9004"),
    ];
    for (expected, counter, code) in any_bin_checks {
        let Some(expected) = expected else { continue };
        let observed = stats.counters().count(counter, TriggerBin::Any);
        if observed != expected {
            errors.push(
                format!(
                    "[{code}] Expected {expected} {counter} events in {bin}, but found {observed}",
                    bin = TriggerBin::Any
                )
                .into(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
