//! Contains the [TriggerMask] physics selection word and the [TriggerBin]s that are counted.
use crate::util::*;

/// The physics selection word of an event.
///
/// Each bit corresponds to an offline trigger class that accepted the event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerMask(u32);

impl TriggerMask {
    /// Any trigger class, all bits.
    pub const ANY: u32 = 0xFFFF_FFFF;
    /// Minimum bias (kINT7).
    pub const MINIMUM_BIAS: u32 = 1 << 1;
    /// Central.
    pub const CENTRAL: u32 = 1 << 4;
    /// Semi-central.
    pub const SEMI_CENTRAL: u32 = 1 << 7;

    /// Create a mask from the raw selection word.
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw selection word.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if any of the bits in `bits` are set in the mask.
    #[inline]
    pub const fn intersects(self, bits: u32) -> bool {
        self.0 & bits != 0
    }
}

impl From<u32> for TriggerMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for TriggerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

/// The trigger classes that events are counted in.
///
/// The discriminant is the bin index on the trigger axis of the counting histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerBin {
    /// Any trigger.
    Any = 0,
    /// Minimum bias trigger.
    MinimumBias = 1,
    /// Central trigger.
    Central = 2,
    /// Semi-central trigger.
    SemiCentral = 3,
}

impl TriggerBin {
    /// Number of trigger bins.
    pub const COUNT: usize = 4;
    /// All trigger bins in bin order.
    pub const ALL: [TriggerBin; Self::COUNT] = [
        TriggerBin::Any,
        TriggerBin::MinimumBias,
        TriggerBin::Central,
        TriggerBin::SemiCentral,
    ];

    /// Bin index on the trigger axis.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Get the trigger bin at a bin index, if the index is in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The selection bits that activate this bin.
    #[inline]
    pub const fn mask_bits(self) -> u32 {
        match self {
            TriggerBin::Any => TriggerMask::ANY,
            TriggerBin::MinimumBias => TriggerMask::MINIMUM_BIAS,
            TriggerBin::Central => TriggerMask::CENTRAL,
            TriggerBin::SemiCentral => TriggerMask::SEMI_CENTRAL,
        }
    }

    /// The axis label of the bin in the counting histograms.
    pub const fn label(self) -> &'static str {
        match self {
            TriggerBin::Any => "kAny",
            TriggerBin::MinimumBias => "kINT7",
            TriggerBin::Central => "kCentral",
            TriggerBin::SemiCentral => "kSemiCentral",
        }
    }

    /// The axis labels of all bins in bin order.
    pub fn labels() -> [&'static str; Self::COUNT] {
        Self::ALL.map(TriggerBin::label)
    }
}

impl fmt::Display for TriggerBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
