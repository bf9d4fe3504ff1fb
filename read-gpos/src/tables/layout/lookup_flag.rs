//! Lookup flags
//!
//! The low byte of a lookup flag holds five flag bits and the high byte a
//! mark attachment class, so the type is written out by hand.

use core::ops::{BitOr, BitOrAssign};

use types::Scalar;

/// The [LookupFlag](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookupFlag)
/// of a lookup table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupFlag(u16);

impl LookupFlag {
    /// Cursive attachment chains end on the first glyph instead of the last.
    ///
    /// Only meaningful for GPOS lookup type 3.
    pub const RIGHT_TO_LEFT: Self = LookupFlag(0x0001);
    /// Skip base glyphs.
    pub const IGNORE_BASE_GLYPHS: Self = LookupFlag(0x0002);
    /// Skip ligatures.
    pub const IGNORE_LIGATURES: Self = LookupFlag(0x0004);
    /// Skip all marks.
    pub const IGNORE_MARKS: Self = LookupFlag(0x0008);
    /// The three `IGNORE_*` flags.
    ///
    /// They share their bit positions with the glyph class bits of a glyph's
    /// properties, so a glyph is skipped when `props & flag & IGNORE_FLAGS`
    /// is not zero.
    pub const IGNORE_FLAGS: Self = LookupFlag(0x000E);
    /// Skip marks outside the lookup's mark filtering set.
    ///
    /// The lookup table has a `markFilteringSet` field when this is set.
    pub const USE_MARK_FILTERING_SET: Self = LookupFlag(0x0010);

    const FLAG_BITS: u16 = 0x001F;
    const RESERVED_BITS: u16 = 0x00E0;
    const MARK_CLASS_BITS: u16 = 0xFF00;

    pub const fn empty() -> Self {
        LookupFlag(0)
    }

    /// A flag from its raw value, dropping the reserved bits.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        LookupFlag(bits & !Self::RESERVED_BITS)
    }

    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// The flag as the low half of a lookup's match props.
    ///
    /// The high half of the props is the mark filtering set, when there is
    /// one.
    pub const fn to_props(self) -> u32 {
        self.0 as u32
    }

    /// Returns `true` if every flag bit of `other` is set.
    ///
    /// The mark attachment class is not compared.
    pub const fn contains(self, other: Self) -> bool {
        let other = other.0 & Self::FLAG_BITS;
        self.0 & other == other
    }

    /// Returns `true` if any flag bit of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 & Self::FLAG_BITS != 0
    }

    /// Marks of any other attachment class are skipped.
    pub const fn mark_attachment_class(self) -> Option<u16> {
        match (self.0 & Self::MARK_CLASS_BITS) >> 8 {
            0 => None,
            class => Some(class),
        }
    }

    pub fn set_mark_attachment_class(&mut self, class: u16) {
        self.0 = (self.0 & !Self::MARK_CLASS_BITS) | ((class & 0xFF) << 8);
    }
}

impl BitOr for LookupFlag {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        LookupFlag(self.0 | rhs.0)
    }
}

impl BitOrAssign for LookupFlag {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Scalar for LookupFlag {
    type Raw = <u16 as Scalar>::Raw;

    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        LookupFlag(u16::from_raw(raw))
    }
}
