//! Table versions

/// The version of a layout table header.
///
/// GPOS and GDEF store their version as a major and a minor `uint16`. A
/// reader accepts any version with a known major number, and newer minor
/// versions only add fields at the end of the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MajorMinor {
    pub major: u16,
    pub minor: u16,
}

impl MajorMinor {
    pub const VERSION_1_0: MajorMinor = MajorMinor::new(1, 0);
    /// GPOS with feature variations.
    pub const VERSION_1_1: MajorMinor = MajorMinor::new(1, 1);
    /// GDEF with mark glyph sets.
    pub const VERSION_1_2: MajorMinor = MajorMinor::new(1, 2);
    /// GDEF with an item variation store.
    pub const VERSION_1_3: MajorMinor = MajorMinor::new(1, 3);

    #[inline]
    pub const fn new(major: u16, minor: u16) -> Self {
        MajorMinor { major, minor }
    }

    /// Returns `true` if a table of this version has every field of `other`.
    ///
    /// That is, the major versions are equal and this minor version is at
    /// least as new.
    #[inline]
    pub const fn compatible(self, other: MajorMinor) -> bool {
        self.major == other.major && self.minor >= other.minor
    }
}

impl crate::Scalar for MajorMinor {
    type Raw = [u8; 4];

    fn from_raw(raw: [u8; 4]) -> Self {
        let [major_hi, major_lo, minor_hi, minor_lo] = raw;
        MajorMinor::new(
            u16::from_be_bytes([major_hi, major_lo]),
            u16::from_be_bytes([minor_hi, minor_lo]),
        )
    }

    fn to_raw(self) -> [u8; 4] {
        let [major_hi, major_lo] = self.major.to_be_bytes();
        let [minor_hi, minor_lo] = self.minor.to_be_bytes();
        [major_hi, major_lo, minor_hi, minor_lo]
    }
}

impl std::fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
