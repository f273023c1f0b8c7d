//! Contains the [VertexRecord] describing a reconstructed vertex candidate, and the [AodVertexType] tag.
use crate::util::*;

/// Vertex type tag carried by the primary vertex of AOD events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AodVertexType {
    /// Undefined vertex.
    Undef,
    /// Primary vertex that failed reconstruction.
    PrimaryInvalid,
    /// Primary vertex reconstructed with TPC tracks only.
    #[serde(rename = "PrimaryTPC")]
    PrimaryTpc,
    /// Primary vertex reconstructed with global tracks.
    Primary,
    /// Any other tag, e.g. pile-up or secondary vertices.
    #[serde(other)]
    Other,
}

impl fmt::Display for AodVertexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AodVertexType::Undef => write!(f, "Undef"),
            AodVertexType::PrimaryInvalid => write!(f, "PrimaryInvalid"),
            AodVertexType::PrimaryTpc => write!(f, "PrimaryTPC"),
            AodVertexType::Primary => write!(f, "Primary"),
            AodVertexType::Other => write!(f, "Other"),
        }
    }
}

/// A reconstructed vertex candidate.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    /// Provenance label, names the algorithm that produced the vertex (e.g. `VertexerTracksNoConstraint`).
    #[serde(default)]
    pub title: String,
    /// Position along the beam axis (cm).
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub chi2_per_ndf: f64,
    #[serde(default)]
    pub n_contributors: i32,
    /// Only set for the primary vertex of AOD events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aod_type: Option<AodVertexType>,
}

impl VertexRecord {
    /// Create a vertex record with a provenance label and position/quality fields.
    pub fn new(title: impl Into<String>, z: f64, chi2_per_ndf: f64, n_contributors: i32) -> Self {
        Self {
            title: title.into(),
            z,
            chi2_per_ndf,
            n_contributors,
            aod_type: None,
        }
    }

    /// Set the AOD vertex type tag.
    pub fn with_aod_type(mut self, aod_type: AodVertexType) -> Self {
        self.aod_type = Some(aod_type);
        self
    }
}
