//! Contains the [VertexClass] and the functions deciding it from the vertex candidates of an event.
use crate::event::{AodVertexType, EventFormat, VertexRecord};
use crate::util::*;

/// Two vertices are considered the same if position and quality agree within this tolerance.
pub const VERTEX_MATCH_TOLERANCE: f64 = 1e-6;

const TRACKS_VERTEXER_LABEL: &str = "VertexerTracks";
const SPD_Z_VERTEXER_LABEL: &str = "ertexer: Z";
const SPD_3D_VERTEXER_LABEL: &str = "ertexer: 3D";

/// The type of the primary vertex.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexClass {
    /// No valid vertex, or one produced by an unrecognized algorithm.
    #[default]
    None = 0,
    /// Vertex from TPC tracks only.
    Tpc = 1,
    /// SPD vertex with only the z coordinate.
    SpdZ = 2,
    /// SPD vertex with all three coordinates.
    Spd3D = 3,
    /// Vertex from global tracks.
    Track = 4,
}

impl VertexClass {
    /// Number of vertex classes.
    pub const COUNT: usize = 5;
    /// All vertex classes in code order.
    pub const ALL: [VertexClass; Self::COUNT] = [
        VertexClass::None,
        VertexClass::Tpc,
        VertexClass::SpdZ,
        VertexClass::Spd3D,
        VertexClass::Track,
    ];

    /// The numeric vertex type code.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for VertexClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexClass::None => write!(f, "None"),
            VertexClass::Tpc => write!(f, "TPC"),
            VertexClass::SpdZ => write!(f, "SPD-Z"),
            VertexClass::Spd3D => write!(f, "SPD-3D"),
            VertexClass::Track => write!(f, "Track"),
        }
    }
}

/// Decide the vertex class from the provenance label of the primary vertex.
///
/// A track vertexer label gives [VertexClass::Tpc] if the primary vertex is the TPC vertex
/// (same z and chi2/ndf within [VERTEX_MATCH_TOLERANCE]), otherwise [VertexClass::Track].
/// Any other label is an SPD vertexer, identified by its `Z` or `3D` suffix.
/// A label matching none of them gives [VertexClass::None].
pub fn class_from_provenance(primary: &VertexRecord, tpc: Option<&VertexRecord>) -> VertexClass {
    if primary.title.contains(TRACKS_VERTEXER_LABEL) {
        match tpc {
            Some(tpc)
                if (primary.z - tpc.z).abs() < VERTEX_MATCH_TOLERANCE
                    && (primary.chi2_per_ndf - tpc.chi2_per_ndf).abs()
                        < VERTEX_MATCH_TOLERANCE =>
            {
                VertexClass::Tpc
            }
            _ => VertexClass::Track,
        }
    } else {
        let mut class = VertexClass::None;
        if primary.title.contains(SPD_Z_VERTEXER_LABEL) {
            class = VertexClass::SpdZ;
        }
        if primary.title.contains(SPD_3D_VERTEXER_LABEL) {
            class = VertexClass::Spd3D;
        }
        class
    }
}

/// Decide the vertex class of an event.
///
/// For AOD events the type tag of the primary vertex overrides the provenance label where it is conclusive:
/// invalid or undefined vertices are [VertexClass::None], TPC primaries are [VertexClass::Tpc].
pub fn classify_vertex(
    primary: &VertexRecord,
    tpc: Option<&VertexRecord>,
    format: EventFormat,
) -> VertexClass {
    let from_label = class_from_provenance(primary, tpc);
    if !format.is_aod() {
        return from_label;
    }
    match primary.aod_type {
        Some(AodVertexType::PrimaryInvalid | AodVertexType::Undef) => VertexClass::None,
        Some(AodVertexType::PrimaryTpc) => VertexClass::Tpc,
        Some(AodVertexType::Primary | AodVertexType::Other) | None => from_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tracks_primary(z: f64, chi2: f64) -> VertexRecord {
        VertexRecord::new("VertexerTracksNoConstraint", z, chi2, 25)
    }

    fn tpc_vertex() -> VertexRecord {
        VertexRecord::new("TPCVertexer", 1.5, 2.25, 18)
    }

    #[test]
    fn test_tracks_label_matching_tpc_is_tpc() {
        let primary = tracks_primary(1.5, 2.25);
        assert_eq!(
            classify_vertex(&primary, Some(&tpc_vertex()), EventFormat::Esd),
            VertexClass::Tpc
        );
    }

    #[test]
    fn test_tracks_label_within_tolerance_is_tpc() {
        let primary = tracks_primary(1.5 + 5e-7, 2.25 - 5e-7);
        assert_eq!(
            class_from_provenance(&primary, Some(&tpc_vertex())),
            VertexClass::Tpc
        );
    }

    #[test]
    fn test_tracks_label_z_differs_is_track() {
        let primary = tracks_primary(2.5, 2.25);
        assert_eq!(
            classify_vertex(&primary, Some(&tpc_vertex()), EventFormat::Esd),
            VertexClass::Track
        );
    }

    #[test]
    fn test_tracks_label_chi2_differs_is_track() {
        let primary = tracks_primary(1.5, 2.0);
        assert_eq!(
            class_from_provenance(&primary, Some(&tpc_vertex())),
            VertexClass::Track
        );
    }

    #[test]
    fn test_tracks_label_without_tpc_is_track() {
        let primary = tracks_primary(1.5, 2.25);
        assert_eq!(class_from_provenance(&primary, None), VertexClass::Track);
    }

    #[test]
    fn test_spd_labels() {
        let z = VertexRecord::new("vertexer: Z", 0.0, 0.0, 3);
        let three_d = VertexRecord::new("SPDVertexer: 3D", 0.0, 0.0, 3);
        let unknown = VertexRecord::new("SomethingElse", 0.0, 0.0, 3);
        let empty = VertexRecord::default();

        assert_eq!(class_from_provenance(&z, None), VertexClass::SpdZ);
        assert_eq!(class_from_provenance(&three_d, None), VertexClass::Spd3D);
        assert_eq!(class_from_provenance(&unknown, None), VertexClass::None);
        assert_eq!(class_from_provenance(&empty, None), VertexClass::None);
    }

    #[test]
    fn test_spd_label_with_both_suffixes_is_3d() {
        let both = VertexRecord::new("vertexer: Z then vertexer: 3D", 0.0, 0.0, 3);
        assert_eq!(class_from_provenance(&both, None), VertexClass::Spd3D);
    }

    #[test]
    fn test_aod_invalid_overrides_everything() {
        let tpc = tpc_vertex();
        let primaries = [
            tracks_primary(1.5, 2.25),
            tracks_primary(9.0, 9.0),
            VertexRecord::new("vertexer: Z", 0.0, 0.0, 3),
            VertexRecord::new("vertexer: 3D", 0.0, 0.0, 3),
            VertexRecord::default(),
        ];
        for primary in primaries {
            for tag in [AodVertexType::PrimaryInvalid, AodVertexType::Undef] {
                let primary = primary.clone().with_aod_type(tag);
                assert_eq!(
                    classify_vertex(&primary, Some(&tpc), EventFormat::Aod),
                    VertexClass::None,
                    "{primary:?}"
                );
            }
        }
    }

    #[test]
    fn test_aod_primary_tpc_overrides_label() {
        let primary =
            VertexRecord::new("vertexer: Z", 0.0, 0.0, 3).with_aod_type(AodVertexType::PrimaryTpc);
        assert_eq!(
            classify_vertex(&primary, None, EventFormat::Aod),
            VertexClass::Tpc
        );
    }

    #[test]
    fn test_aod_other_tags_keep_label_class() {
        let primary = tracks_primary(9.0, 9.0).with_aod_type(AodVertexType::Primary);
        assert_eq!(
            classify_vertex(&primary, Some(&tpc_vertex()), EventFormat::Aod),
            VertexClass::Track
        );
        let untagged = VertexRecord::new("vertexer: 3D", 0.0, 0.0, 3);
        assert_eq!(
            classify_vertex(&untagged, None, EventFormat::Aod),
            VertexClass::Spd3D
        );
    }

    #[test]
    fn test_esd_ignores_aod_tag() {
        let primary = tracks_primary(9.0, 9.0).with_aod_type(AodVertexType::PrimaryInvalid);
        assert_eq!(
            classify_vertex(&primary, Some(&tpc_vertex()), EventFormat::Esd),
            VertexClass::Track
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            VertexClass::ALL.map(VertexClass::code),
            [0, 1, 2, 3, 4]
        );
    }
}
