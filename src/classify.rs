//! Contains the [EventClassifier] that turns one [EventRecord] into an [Observation].
//!
//! Classification is a pure function of the event, no state is kept between events.
//! The steps are:
//! 1. [active_triggers]: which [TriggerBin]s the selection word activates.
//! 2. [classify_vertex]: the [VertexClass] of the primary vertex.
//! 3. [centrality]: the centrality percentile from the configured estimator, or the default.
//! 4. [EventClassifier::classify]: combines the above into an [Observation], which expands into the [CounterRecord]s to fill.

pub mod observation;
pub mod vertex_class;

pub use observation::{ActiveTriggers, Counter, CounterRecord, Observation};
pub use vertex_class::{class_from_provenance, classify_vertex, VertexClass};

use crate::event::{EventRecord, Multiplicity, TriggerBin, TriggerMask};
use crate::util::*;

/// Centrality assigned when no multiplicity estimate is available. Puts the event in the first centrality bin.
pub const DEFAULT_CENTRALITY: f64 = 0.1;
/// Estimator used for the centrality percentile unless configured otherwise.
pub const DEFAULT_ESTIMATOR: &str = "V0M";

/// Returns the trigger bins activated by the selection word.
///
/// Every bin is tested independently, so any number of bins can be active.
pub fn active_triggers(mask: TriggerMask) -> ActiveTriggers {
    let mut active = ActiveTriggers::default();
    TriggerBin::ALL
        .into_iter()
        .filter(|bin| mask.intersects(bin.mask_bits()))
        .for_each(|bin| active.insert(bin));
    active
}

/// Centrality of an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Centrality {
    /// Percentile read from the multiplicity estimator.
    Measured(f64),
    /// No estimate available, [DEFAULT_CENTRALITY] is used.
    Defaulted,
}

impl Centrality {
    /// The centrality percentile to fill.
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Centrality::Measured(val) => val,
            Centrality::Defaulted => DEFAULT_CENTRALITY,
        }
    }

    /// Returns true if no estimate was available and the default was substituted.
    #[inline]
    pub fn is_defaulted(self) -> bool {
        matches!(self, Centrality::Defaulted)
    }
}

impl fmt::Display for Centrality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Centrality::Measured(val) => write!(f, "{val:.2}"),
            Centrality::Defaulted => write!(f, "{DEFAULT_CENTRALITY:.2} (default)"),
        }
    }
}

/// Reads the centrality percentile of `estimator` from the multiplicity object.
///
/// An absent multiplicity object, or one without the estimator, gives [Centrality::Defaulted].
pub fn centrality(multiplicity: Option<&Multiplicity>, estimator: &str) -> Centrality {
    multiplicity
        .and_then(|mult| mult.percentile(estimator))
        .map_or(Centrality::Defaulted, Centrality::Measured)
}

/// Error returned when an event cannot be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyError {
    /// The event source had no event for this entry.
    MissingEvent,
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::MissingEvent => write!(f, "[E11] Missing event, skipped"),
        }
    }
}

impl error::Error for ClassifyError {}

/// Classifies events by trigger, vertex type and centrality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventClassifier {
    estimator: Box<str>,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ESTIMATOR)
    }
}

impl EventClassifier {
    /// Create a classifier that reads the centrality from `estimator`.
    pub fn new(estimator: &str) -> Self {
        Self {
            estimator: estimator.into(),
        }
    }

    /// The multiplicity estimator used for the centrality.
    pub fn estimator(&self) -> &str {
        &self.estimator
    }

    /// Classify an event.
    ///
    /// Fails with [ClassifyError::MissingEvent] if there's no event, in which case nothing should be counted.
    pub fn classify(&self, event: Option<&EventRecord>) -> Result<Observation, ClassifyError> {
        let event = event.ok_or(ClassifyError::MissingEvent)?;

        let vertex_class = classify_vertex(
            &event.primary_vertex,
            event.tpc_vertex.as_ref(),
            event.format,
        );

        Ok(Observation {
            triggers: active_triggers(event.trigger_mask),
            centrality: centrality(event.multiplicity.as_ref(), &self.estimator),
            vertex_class,
            spd_vertex: event.spd_contributors() >= 1,
            track_vertex: vertex_class == VertexClass::Track,
        })
    }
}
