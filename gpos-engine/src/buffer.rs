//! The glyph buffer positioned by the engine.
//!
//! A [`Buffer`] holds one [`GlyphInfo`] and one [`GlyphPosition`] per glyph.
//! The infos are produced by the earlier stages of shaping (character
//! mapping, substitution) and are treated as read-only here, apart from the
//! glyph properties and the unsafe-to-break flags. The positions are what
//! the engine computes.

use read_gpos::types::GlyphId;

/// Bits of [`GlyphInfo::glyph_props`].
pub mod glyph_props {
    pub use read_gpos::tables::gdef::glyph_props::{BASE_GLYPH, LIGATURE, MARK};

    /// The glyph was produced by a substitution.
    pub const SUBSTITUTED: u16 = 0x10;
    /// The glyph was produced by a ligature substitution.
    pub const LIGATED: u16 = 0x20;
    /// The glyph was produced by a multiple substitution.
    pub const MULTIPLIED: u16 = 0x40;

    /// The properties set by substitution, kept when classes are reassigned.
    pub const PRESERVE: u16 = SUBSTITUTED | LIGATED | MULTIPLIED;
}

/// Bits of [`GlyphInfo::unicode_props`].
///
/// The high byte holds the modified combining class for marks, and the
/// joiner flags for format characters.
pub mod unicode_props {
    pub const GENERAL_CATEGORY: u16 = 0x1F;
    pub const IGNORABLE: u16 = 0x20;
    pub const CF_ZWJ: u16 = 0x100;
    pub const CF_ZWNJ: u16 = 0x200;
}

/// Bits of [`GlyphInfo::glyph_flags`].
pub mod glyph_flags {
    /// Shaping the text on either side of this glyph separately would give
    /// a different result.
    pub const UNSAFE_TO_BREAK: u32 = 0x0000_0001;
}

/// Bits of [`Buffer::scratch_flags`].
pub mod scratch_flags {
    /// At least one glyph was attached by a mark or cursive lookup.
    pub const HAS_GPOS_ATTACHMENT: u32 = 0x0000_0008;
    /// At least one glyph carries glyph flags.
    pub const HAS_GLYPH_FLAGS: u32 = 0x0000_0020;
}

/// The Unicode general category of the character a glyph was mapped from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GeneralCategory {
    Control = 0,
    Format,
    #[default]
    Unassigned,
    PrivateUse,
    Surrogate,
    LowercaseLetter,
    ModifierLetter,
    OtherLetter,
    TitlecaseLetter,
    UppercaseLetter,
    SpacingMark,
    EnclosingMark,
    NonspacingMark,
    DecimalNumber,
    LetterNumber,
    OtherNumber,
    ConnectPunctuation,
    DashPunctuation,
    ClosePunctuation,
    FinalPunctuation,
    InitialPunctuation,
    OtherPunctuation,
    OpenPunctuation,
    CurrencySymbol,
    ModifierSymbol,
    MathSymbol,
    OtherSymbol,
    LineSeparator,
    ParagraphSeparator,
    SpaceSeparator,
}

impl GeneralCategory {
    const ALL: [GeneralCategory; 30] = [
        Self::Control,
        Self::Format,
        Self::Unassigned,
        Self::PrivateUse,
        Self::Surrogate,
        Self::LowercaseLetter,
        Self::ModifierLetter,
        Self::OtherLetter,
        Self::TitlecaseLetter,
        Self::UppercaseLetter,
        Self::SpacingMark,
        Self::EnclosingMark,
        Self::NonspacingMark,
        Self::DecimalNumber,
        Self::LetterNumber,
        Self::OtherNumber,
        Self::ConnectPunctuation,
        Self::DashPunctuation,
        Self::ClosePunctuation,
        Self::FinalPunctuation,
        Self::InitialPunctuation,
        Self::OtherPunctuation,
        Self::OpenPunctuation,
        Self::CurrencySymbol,
        Self::ModifierSymbol,
        Self::MathSymbol,
        Self::OtherSymbol,
        Self::LineSeparator,
        Self::ParagraphSeparator,
        Self::SpaceSeparator,
    ];

    fn from_bits(bits: u16) -> Self {
        Self::ALL
            .get(bits as usize)
            .copied()
            .unwrap_or(Self::Unassigned)
    }

    /// Returns `true` for the three mark categories (Mn, Mc and Me).
    #[inline]
    pub fn is_mark(self) -> bool {
        matches!(
            self,
            Self::SpacingMark | Self::EnclosingMark | Self::NonspacingMark
        )
    }
}

/// The shaping state of a single glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphInfo {
    pub glyph_id: GlyphId,
    /// Index of the first character this glyph was produced from.
    pub cluster: u32,
    /// The feature mask; a lookup only applies where its mask intersects this.
    pub mask: u32,
    /// See [`glyph_props`].
    pub glyph_props: u16,
    /// Ligature id in bits 5-7, the component (or component count for a
    /// ligature) in bits 0-3.
    pub lig_props: u8,
    pub syllable: u8,
    /// See [`unicode_props`].
    pub unicode_props: u16,
    /// See [`glyph_flags`].
    pub glyph_flags: u32,
}

impl GlyphInfo {
    const IS_LIG_BASE: u8 = 0x10;

    /// Create a glyph that matches every lookup mask.
    pub fn new(glyph_id: impl Into<GlyphId>, cluster: u32) -> Self {
        let mut info = GlyphInfo {
            glyph_id: glyph_id.into(),
            cluster,
            mask: u32::MAX,
            glyph_props: 0,
            lig_props: 0,
            syllable: 0,
            unicode_props: 0,
            glyph_flags: 0,
        };
        info.set_general_category(GeneralCategory::OtherLetter);
        info
    }

    #[inline]
    pub fn is_base_glyph(&self) -> bool {
        self.glyph_props & glyph_props::BASE_GLYPH != 0
    }

    #[inline]
    pub fn is_ligature(&self) -> bool {
        self.glyph_props & glyph_props::LIGATURE != 0
    }

    #[inline]
    pub fn is_mark(&self) -> bool {
        self.glyph_props & glyph_props::MARK != 0
    }

    #[inline]
    pub fn is_multiplied(&self) -> bool {
        self.glyph_props & glyph_props::MULTIPLIED != 0
    }

    /// Mark this glyph as a ligature with the given id and component count.
    #[inline]
    pub fn set_lig_props_for_ligature(&mut self, lig_id: u8, num_comps: u8) {
        self.lig_props = (lig_id << 5) | Self::IS_LIG_BASE | (num_comps & 0x0F);
    }

    /// Mark this glyph as belonging to component `lig_comp` of ligature `lig_id`.
    #[inline]
    pub fn set_lig_props_for_mark(&mut self, lig_id: u8, lig_comp: u8) {
        self.lig_props = (lig_id << 5) | (lig_comp & 0x0F);
    }

    #[inline]
    pub fn lig_id(&self) -> u8 {
        self.lig_props >> 5
    }

    #[inline]
    fn is_ligated_internal(&self) -> bool {
        self.lig_props & Self::IS_LIG_BASE != 0
    }

    /// The ligature component this glyph belongs to, or 0 for a ligature.
    #[inline]
    pub fn lig_comp(&self) -> u8 {
        if self.is_ligated_internal() {
            0
        } else {
            self.lig_props & 0x0F
        }
    }

    /// The number of components of a ligature; 1 for any other glyph.
    #[inline]
    pub fn lig_num_comps(&self) -> u8 {
        if self.is_ligature() && self.is_ligated_internal() {
            self.lig_props & 0x0F
        } else {
            1
        }
    }

    #[inline]
    pub fn general_category(&self) -> GeneralCategory {
        GeneralCategory::from_bits(self.unicode_props & unicode_props::GENERAL_CATEGORY)
    }

    /// Set the general category, clearing the high byte.
    #[inline]
    pub fn set_general_category(&mut self, category: GeneralCategory) {
        let low = self.unicode_props & (0xFF & !unicode_props::GENERAL_CATEGORY);
        self.unicode_props = category as u16 | low;
    }

    #[inline]
    pub fn is_unicode_mark(&self) -> bool {
        self.general_category().is_mark()
    }

    /// The combining class; always 0 for glyphs that are not Unicode marks.
    #[inline]
    pub fn modified_combining_class(&self) -> u8 {
        if self.is_unicode_mark() {
            (self.unicode_props >> 8) as u8
        } else {
            0
        }
    }

    /// Only has an effect on Unicode marks.
    #[inline]
    pub fn set_modified_combining_class(&mut self, class: u8) {
        if !self.is_unicode_mark() {
            return;
        }
        self.unicode_props = ((class as u16) << 8) | (self.unicode_props & 0xFF);
    }

    #[inline]
    pub fn is_default_ignorable(&self) -> bool {
        self.unicode_props & unicode_props::IGNORABLE != 0
    }

    #[inline]
    pub fn set_default_ignorable(&mut self) {
        self.unicode_props |= unicode_props::IGNORABLE;
    }

    #[inline]
    fn is_unicode_format(&self) -> bool {
        self.general_category() == GeneralCategory::Format
    }

    #[inline]
    pub fn is_zwj(&self) -> bool {
        self.is_unicode_format() && self.unicode_props & unicode_props::CF_ZWJ != 0
    }

    #[inline]
    pub fn is_zwnj(&self) -> bool {
        self.is_unicode_format() && self.unicode_props & unicode_props::CF_ZWNJ != 0
    }

    /// Mark this glyph as a (default ignorable) zero width joiner.
    pub fn set_zwj(&mut self) {
        self.set_general_category(GeneralCategory::Format);
        self.unicode_props |= unicode_props::IGNORABLE | unicode_props::CF_ZWJ;
    }

    /// Mark this glyph as a (default ignorable) zero width non-joiner.
    pub fn set_zwnj(&mut self) {
        self.set_general_category(GeneralCategory::Format);
        self.unicode_props |= unicode_props::IGNORABLE | unicode_props::CF_ZWNJ;
    }

    #[inline]
    pub fn is_unsafe_to_break(&self) -> bool {
        self.glyph_flags & glyph_flags::UNSAFE_TO_BREAK != 0
    }
}

/// How a glyph is attached to the glyph its `attach_chain` points at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttachType {
    #[default]
    None,
    Mark,
    Cursive,
}

/// The computed position of a single glyph, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphPosition {
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    /// Relative index of the glyph this one is attached to; 0 when unattached.
    pub attach_chain: i16,
    pub attach_type: AttachType,
}

/// The direction text is laid out in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl Direction {
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// Returns `true` when glyphs advance towards increasing coordinates.
    #[inline]
    pub fn is_forward(self) -> bool {
        matches!(self, Self::LeftToRight | Self::TopToBottom)
    }

    #[inline]
    pub fn is_backward(self) -> bool {
        !self.is_forward()
    }
}

/// A run of glyphs with their positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Buffer {
    pub info: Vec<GlyphInfo>,
    pub pos: Vec<GlyphPosition>,
    pub direction: Direction,
    /// The cursor used while applying a lookup.
    pub idx: usize,
    /// See [`scratch_flags`].
    pub scratch_flags: u32,
}

impl Buffer {
    pub fn new(direction: Direction) -> Self {
        Buffer {
            direction,
            ..Default::default()
        }
    }

    /// Append a glyph with a zeroed position.
    pub fn push(&mut self, info: GlyphInfo) {
        self.info.push(info);
        self.pos.push(GlyphPosition::default());
    }

    pub fn len(&self) -> usize {
        self.info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// The glyph under the cursor.
    #[inline]
    pub fn cur(&self) -> &GlyphInfo {
        &self.info[self.idx]
    }

    #[inline]
    pub fn next_glyph(&mut self) {
        self.idx += 1;
    }

    /// Reset every position to zero.
    pub fn clear_positions(&mut self) {
        self.pos.clear();
        self.pos.resize(self.info.len(), GlyphPosition::default());
    }

    /// Flag `start..end` as unsafe to break.
    ///
    /// Every glyph in the range whose cluster differs from the smallest
    /// cluster in the range is flagged.
    pub fn unsafe_to_break(&mut self, start: usize, end: usize) {
        let end = end.min(self.info.len());
        if end <= start || end - start < 2 {
            return;
        }
        let infos = &mut self.info[start..end];
        let Some(cluster) = infos.iter().map(|info| info.cluster).min() else {
            return;
        };
        let mut flagged = false;
        for info in infos.iter_mut().filter(|info| info.cluster != cluster) {
            info.glyph_flags |= glyph_flags::UNSAFE_TO_BREAK;
            flagged = true;
        }
        if flagged {
            self.scratch_flags |= scratch_flags::HAS_GLYPH_FLAGS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(clusters: &[u32]) -> Buffer {
        let mut buffer = Buffer::new(Direction::LeftToRight);
        for (i, cluster) in clusters.iter().enumerate() {
            buffer.push(GlyphInfo::new(GlyphId::new(i as u32), *cluster));
        }
        buffer
    }

    #[test]
    fn unsafe_to_break_skips_minimum_cluster() {
        let mut buffer = buffer(&[0, 0, 1, 2]);
        buffer.unsafe_to_break(0, 3);
        let flags: Vec<_> = buffer.info.iter().map(|i| i.is_unsafe_to_break()).collect();
        assert_eq!(flags, [false, false, true, false]);
        assert!(buffer.scratch_flags & scratch_flags::HAS_GLYPH_FLAGS != 0);
    }

    #[test]
    fn unsafe_to_break_ignores_short_ranges() {
        let mut buffer = buffer(&[0, 1]);
        buffer.unsafe_to_break(1, 2);
        buffer.unsafe_to_break(1, 10);
        assert!(buffer.info.iter().all(|i| !i.is_unsafe_to_break()));
        assert_eq!(buffer.scratch_flags, 0);
    }

    #[test]
    fn ligature_properties() {
        let mut info = GlyphInfo::new(GlyphId::new(1), 0);
        info.glyph_props = glyph_props::LIGATURE;
        info.set_lig_props_for_ligature(3, 4);
        assert_eq!(info.lig_id(), 3);
        assert_eq!(info.lig_comp(), 0);
        assert_eq!(info.lig_num_comps(), 4);

        info.set_lig_props_for_mark(3, 2);
        assert_eq!(info.lig_comp(), 2);
        assert_eq!(info.lig_num_comps(), 1);
    }

    #[test]
    fn combining_class_only_for_marks() {
        let mut info = GlyphInfo::new(GlyphId::new(1), 0);
        info.set_modified_combining_class(230);
        assert_eq!(info.modified_combining_class(), 0);

        info.set_general_category(GeneralCategory::NonspacingMark);
        info.set_modified_combining_class(230);
        assert_eq!(info.modified_combining_class(), 230);
        assert!(info.is_unicode_mark());
    }

    #[test]
    fn joiners() {
        let mut info = GlyphInfo::new(GlyphId::new(1), 0);
        assert!(!info.is_zwj());
        info.set_zwj();
        assert!(info.is_zwj());
        assert!(!info.is_zwnj());
        assert!(info.is_default_ignorable());
    }
}
