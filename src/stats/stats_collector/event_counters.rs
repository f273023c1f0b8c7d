//! Contains [EventCounters], the six histograms that events are counted in.
use crate::util::*;

const CENTRALITY_BINS: usize = 100;
const CENTRALITY_MIN: f64 = 0.0;
const CENTRALITY_MAX: f64 = 100.0;

/// Axis of the trigger bins, one bin per [TriggerBin] centered on its index.
pub fn trigger_axis() -> Axis {
    Axis::new(TriggerBin::COUNT, -0.5, TriggerBin::COUNT as f64 - 0.5)
}

/// Axis of the centrality percentile.
pub fn centrality_axis() -> Axis {
    Axis::new(CENTRALITY_BINS, CENTRALITY_MIN, CENTRALITY_MAX)
}

/// Name of the integrated histogram of a counter.
pub const fn hist_name(counter: Counter) -> &'static str {
    match counter {
        Counter::PhysSel => "hNEventsPhysSel",
        Counter::SpdVert => "hNEventsSPDVert",
        Counter::TrackVert => "hNEventsTrackVert",
    }
}

/// Name of the centrality-differential histogram of a counter.
pub const fn hist_vs_cent_name(counter: Counter) -> &'static str {
    match counter {
        Counter::PhysSel => "hNEventsPhysSelVsCent",
        Counter::SpdVert => "hNEventsSPDVertVsCent",
        Counter::TrackVert => "hNEventsTrackVertVsCent",
    }
}

const fn counter_title(counter: Counter) -> &'static str {
    match counter {
        Counter::PhysSel => "Events after physics selection",
        Counter::SpdVert => "Events after physics selection with SPD vertex",
        Counter::TrackVert => "Events after physics selection with track vertex",
    }
}

/// Per-trigger event counts, integrated and versus centrality, for each [Counter].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCounters {
    phys_sel: Hist1D,
    spd_vert: Hist1D,
    track_vert: Hist1D,
    phys_sel_vs_cent: Hist2D,
    spd_vert_vs_cent: Hist2D,
    track_vert_vs_cent: Hist2D,
}

impl Default for EventCounters {
    fn default() -> Self {
        let hist = |counter| {
            Hist1D::new(hist_name(counter), counter_title(counter), trigger_axis())
                .with_labels(&TriggerBin::labels())
        };
        let hist_vs_cent = |counter| {
            Hist2D::new(
                hist_vs_cent_name(counter),
                format!("{} vs. centrality", counter_title(counter)),
                trigger_axis(),
                centrality_axis(),
            )
        };
        Self {
            phys_sel: hist(Counter::PhysSel),
            spd_vert: hist(Counter::SpdVert),
            track_vert: hist(Counter::TrackVert),
            phys_sel_vs_cent: hist_vs_cent(Counter::PhysSel),
            spd_vert_vs_cent: hist_vs_cent(Counter::SpdVert),
            track_vert_vs_cent: hist_vs_cent(Counter::TrackVert),
        }
    }
}

impl EventCounters {
    /// Fill one count in the integrated and the centrality histogram of the record's counter.
    pub fn record(&mut self, record: CounterRecord) {
        let trigger = record.bin.index() as f64;
        let (hist, hist_vs_cent) = match record.counter {
            Counter::PhysSel => (&mut self.phys_sel, &mut self.phys_sel_vs_cent),
            Counter::SpdVert => (&mut self.spd_vert, &mut self.spd_vert_vs_cent),
            Counter::TrackVert => (&mut self.track_vert, &mut self.track_vert_vs_cent),
        };
        hist.fill(trigger);
        hist_vs_cent.fill(trigger, record.centrality);
    }

    /// Fill all the counts of a classified event.
    pub fn record_observation(&mut self, observation: &Observation) {
        observation.records().for_each(|record| self.record(record));
    }

    /// The integrated histogram of a counter.
    pub fn hist(&self, counter: Counter) -> &Hist1D {
        match counter {
            Counter::PhysSel => &self.phys_sel,
            Counter::SpdVert => &self.spd_vert,
            Counter::TrackVert => &self.track_vert,
        }
    }

    /// The centrality-differential histogram of a counter.
    pub fn hist_vs_cent(&self, counter: Counter) -> &Hist2D {
        match counter {
            Counter::PhysSel => &self.phys_sel_vs_cent,
            Counter::SpdVert => &self.spd_vert_vs_cent,
            Counter::TrackVert => &self.track_vert_vs_cent,
        }
    }

    /// Count of a counter in a trigger bin.
    pub fn count(&self, counter: Counter, bin: TriggerBin) -> u64 {
        self.hist(counter).bin_content(bin.index() + 1)
    }

    /// Add the counts of another set of counters.
    pub fn merge(&mut self, other: &Self) -> Result<(), String> {
        self.phys_sel.merge(&other.phys_sel)?;
        self.spd_vert.merge(&other.spd_vert)?;
        self.track_vert.merge(&other.track_vert)?;
        self.phys_sel_vs_cent.merge(&other.phys_sel_vs_cent)?;
        self.spd_vert_vs_cent.merge(&other.spd_vert_vs_cent)?;
        self.track_vert_vs_cent.merge(&other.track_vert_vs_cent)?;
        Ok(())
    }

    pub(super) fn validate_other(&self, other: &Self) -> Result<(), Vec<String>> {
        let mut errs: Vec<String> = Vec::new();
        for counter in Counter::ALL {
            let mut any_bin_mismatch = false;
            for bin in TriggerBin::ALL {
                let (this, expected) = (self.count(counter, bin), other.count(counter, bin));
                if this != expected {
                    any_bin_mismatch = true;
                    errs.push(format!(
                        "{name}[{bin}] mismatch: collected {this} != expected {expected}",
                        name = hist_name(counter)
                    ));
                }
            }
            if !any_bin_mismatch && self.hist(counter) != other.hist(counter) {
                errs.push(format!(
                    "{name} mismatch outside the trigger bins",
                    name = hist_name(counter)
                ));
            }
            if self.hist_vs_cent(counter) != other.hist_vs_cent(counter) {
                errs.push(format!(
                    "{name} mismatch: collected {this} entries, expected {expected}",
                    name = hist_vs_cent_name(counter),
                    this = self.hist_vs_cent(counter).entries(),
                    expected = other.hist_vs_cent(counter).entries()
                ));
            }
        }
        if errs.is_empty() {
            Ok(())
        } else {
            Err(errs)
        }
    }
}
