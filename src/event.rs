//! Contains the event data model: the [EventRecord] read from the input and the types it is built from.
//!
//! An [EventRecord] carries everything needed to classify one event:
//! - The physics selection word ([TriggerMask]).
//! - The event format ([EventFormat]), which decides if the AOD vertex type tag is trusted over the provenance label.
//! - The primary, TPC, and SPD vertex candidates ([VertexRecord]).
//! - The (optional) [Multiplicity] percentiles provided by the centrality framework.

pub mod trigger;
pub mod vertex;

pub use trigger::{TriggerBin, TriggerMask};
pub use vertex::{AodVertexType, VertexRecord};

use crate::util::*;
use std::collections::BTreeMap;

/// The format kind of the reconstructed event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFormat {
    /// Event Summary Data, the vertex type is only known through the provenance label.
    #[default]
    #[serde(rename = "ESD", alias = "esd")]
    Esd,
    /// Analysis Object Data, the primary vertex carries an explicit type tag.
    #[serde(rename = "AOD", alias = "aod")]
    Aod,
}

impl EventFormat {
    /// Returns true if the event is of the AOD (already reduced) kind.
    #[inline]
    pub fn is_aod(self) -> bool {
        matches!(self, EventFormat::Aod)
    }
}

impl fmt::Display for EventFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFormat::Esd => write!(f, "ESD"),
            EventFormat::Aod => write!(f, "AOD"),
        }
    }
}

/// Multiplicity percentiles of an event, keyed by estimator name (e.g. `V0M`).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplicity {
    percentiles: BTreeMap<String, f64>,
}

impl Multiplicity {
    /// Returns the percentile of the given estimator if it was provided.
    pub fn percentile(&self, estimator: &str) -> Option<f64> {
        self.percentiles.get(estimator).copied()
    }

    /// Returns the names of the estimators available for this event.
    pub fn estimators(&self) -> impl Iterator<Item = &str> {
        self.percentiles.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Multiplicity {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            percentiles: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// One event as supplied by the event source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub format: EventFormat,
    #[serde(default)]
    pub trigger_mask: TriggerMask,
    pub primary_vertex: VertexRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpc_vertex: Option<VertexRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spd_vertex: Option<VertexRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<Multiplicity>,
}

impl EventRecord {
    /// Returns the number of contributors to the SPD vertex, or 0 if there's no SPD vertex.
    pub fn spd_contributors(&self) -> i32 {
        self.spd_vertex.as_ref().map_or(0, |v| v.n_contributors)
    }
}
