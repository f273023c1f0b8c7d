//! Contains the [Observation] produced by classifying an event, and the [CounterRecord]s it expands into.
use super::{Centrality, VertexClass};
use crate::event::TriggerBin;
use crate::util::*;

/// Set of [TriggerBin]s activated by an event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTriggers {
    bins: [bool; TriggerBin::COUNT],
}

impl ActiveTriggers {
    /// Mark a bin as active.
    pub fn insert(&mut self, bin: TriggerBin) {
        self.bins[bin.index()] = true;
    }

    /// Returns true if the bin is active.
    #[inline]
    pub fn contains(&self, bin: TriggerBin) -> bool {
        self.bins[bin.index()]
    }

    /// Returns true if no bin is active.
    pub fn is_empty(&self) -> bool {
        !self.bins.iter().any(|&active| active)
    }

    /// Number of active bins.
    pub fn len(&self) -> usize {
        self.bins.iter().filter(|&&active| active).count()
    }

    /// Iterate over the active bins in bin order.
    pub fn iter(&self) -> impl Iterator<Item = TriggerBin> + '_ {
        TriggerBin::ALL
            .into_iter()
            .filter(move |bin| self.contains(*bin))
    }
}

impl fmt::Display for ActiveTriggers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.iter().join(" "))
        }
    }
}

/// The counters events are recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Counter {
    /// Events passing the physics selection.
    PhysSel,
    /// Events passing the physics selection with an SPD vertex.
    SpdVert,
    /// Events passing the physics selection with a track vertex.
    TrackVert,
}

impl Counter {
    /// All counters.
    pub const ALL: [Counter; 3] = [Counter::PhysSel, Counter::SpdVert, Counter::TrackVert];
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counter::PhysSel => write!(f, "PhysSel"),
            Counter::SpdVert => write!(f, "SPDVert"),
            Counter::TrackVert => write!(f, "TrackVert"),
        }
    }
}

/// A single count to add: the counter, the trigger bin, and the centrality of the event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterRecord {
    /// Histogram pair to fill.
    pub counter: Counter,
    /// Trigger bin of the count.
    pub bin: TriggerBin,
    /// Centrality percentile of the event.
    pub centrality: f64,
}

/// The classification of one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Trigger bins the event is counted in.
    pub triggers: ActiveTriggers,
    /// Centrality from the configured estimator, or the default if there was no estimate.
    pub centrality: Centrality,
    /// Vertex type of the primary vertex.
    pub vertex_class: VertexClass,
    /// The event has an SPD vertex with at least one contributor.
    pub spd_vertex: bool,
    /// The primary vertex is a track vertex.
    pub track_vertex: bool,
}

impl Observation {
    /// Expands the observation into the counts to fill, per active trigger bin in bin order.
    pub fn records(&self) -> impl Iterator<Item = CounterRecord> + '_ {
        let centrality = self.centrality.value();
        self.triggers.iter().flat_map(move |bin| {
            [
                Some(Counter::PhysSel),
                self.spd_vertex.then_some(Counter::SpdVert),
                self.track_vertex.then_some(Counter::TrackVert),
            ]
            .into_iter()
            .flatten()
            .map(move |counter| CounterRecord {
                counter,
                bin,
                centrality,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_active_triggers_set() {
        let mut active = ActiveTriggers::default();
        assert!(active.is_empty());
        assert_eq!(active.to_string(), "none");

        active.insert(TriggerBin::SemiCentral);
        active.insert(TriggerBin::Any);
        active.insert(TriggerBin::Any);

        assert_eq!(active.len(), 2);
        assert!(active.contains(TriggerBin::Any));
        assert!(!active.contains(TriggerBin::Central));
        assert_eq!(active.to_string(), "kAny kSemiCentral");
    }

    #[test]
    fn test_records_order() {
        let mut triggers = ActiveTriggers::default();
        triggers.insert(TriggerBin::Any);
        triggers.insert(TriggerBin::Central);
        let obs = Observation {
            triggers,
            centrality: Centrality::Defaulted,
            vertex_class: VertexClass::Track,
            spd_vertex: true,
            track_vertex: true,
        };

        let records: Vec<(Counter, TriggerBin)> =
            obs.records().map(|r| (r.counter, r.bin)).collect();

        assert_eq!(
            records,
            vec![
                (Counter::PhysSel, TriggerBin::Any),
                (Counter::SpdVert, TriggerBin::Any),
                (Counter::TrackVert, TriggerBin::Any),
                (Counter::PhysSel, TriggerBin::Central),
                (Counter::SpdVert, TriggerBin::Central),
                (Counter::TrackVert, TriggerBin::Central),
            ]
        );
        assert!(obs.records().all(|r| r.centrality == 0.1));
    }
}
