//! Glyph classification and the lookup flag filter.

use read_gpos::tables::{gdef::Gdef, layout::LookupFlag};

use crate::buffer::{glyph_props, Buffer, GeneralCategory, GlyphInfo};

/// Classify every glyph in the buffer as a base, ligature or mark.
///
/// Classes come from the GDEF glyph class definition when there is one.
/// Otherwise non-spacing marks become marks and everything else a base.
/// The bits recorded by substitution are kept.
pub fn set_glyph_props_from_gdef(gdef: Option<&Gdef>, buffer: &mut Buffer) {
    let gdef = gdef.filter(|gdef| gdef.has_glyph_classes());
    for info in &mut buffer.info {
        let props = match gdef {
            Some(gdef) => gdef.glyph_props(info.glyph_id),
            None => synthesized_props(info),
        };
        info.glyph_props = (info.glyph_props & glyph_props::PRESERVE) | props;
    }
}

fn synthesized_props(info: &GlyphInfo) -> u16 {
    if info.general_category() == GeneralCategory::NonspacingMark && !info.is_default_ignorable() {
        glyph_props::MARK
    } else {
        glyph_props::BASE_GLYPH
    }
}

/// Returns `true` if a lookup with the given props may see this glyph.
///
/// `match_props` is the lookup flag in the low 16 bits and the mark
/// filtering set in the high 16 bits.
pub fn check_glyph_property(info: &GlyphInfo, match_props: u32, gdef: Option<&Gdef>) -> bool {
    let props = info.glyph_props as u32;
    if props & match_props & LookupFlag::IGNORE_FLAGS.to_props() != 0 {
        return false;
    }
    if info.is_mark() {
        return match_mark_glyph(info, match_props, gdef);
    }
    true
}

fn match_mark_glyph(info: &GlyphInfo, match_props: u32, gdef: Option<&Gdef>) -> bool {
    if match_props & LookupFlag::USE_MARK_FILTERING_SET.to_props() != 0 {
        let set_index = (match_props >> 16) as u16;
        return gdef.is_some_and(|gdef| gdef.mark_set_covers(set_index, info.glyph_id));
    }
    // mark attachment type
    if match_props & 0xFF00 != 0 {
        return match_props & 0xFF00 == info.glyph_props as u32 & 0xFF00;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Direction;
    use gpos_test_data::gdef as test_data;
    use read_gpos::{types::GlyphId, FontRead};

    fn buffer(glyphs: &[u32]) -> Buffer {
        let mut buffer = Buffer::new(Direction::LeftToRight);
        for (cluster, gid) in glyphs.iter().enumerate() {
            buffer.push(GlyphInfo::new(GlyphId::new(*gid), cluster as u32));
        }
        buffer
    }

    fn props(buffer: &Buffer) -> Vec<u16> {
        buffer.info.iter().map(|info| info.glyph_props).collect()
    }

    #[test]
    fn props_from_gdef_classes() {
        let gdef = Gdef::read(test_data::GDEF_V1_2.into()).unwrap();
        let mut buffer = buffer(&[5, 10, 20, 27]);
        buffer.info[1].glyph_props = glyph_props::LIGATED;
        set_glyph_props_from_gdef(Some(&gdef), &mut buffer);
        assert_eq!(
            props(&buffer),
            [
                glyph_props::BASE_GLYPH,
                glyph_props::LIGATURE | glyph_props::LIGATED,
                glyph_props::MARK | 0x100,
                glyph_props::MARK | 0x200,
            ]
        );
    }

    #[test]
    fn props_without_gdef_use_general_category() {
        let mut buffer = buffer(&[1, 2, 3]);
        buffer.info[1].set_general_category(GeneralCategory::NonspacingMark);
        buffer.info[2].set_general_category(GeneralCategory::SpacingMark);
        set_glyph_props_from_gdef(None, &mut buffer);
        assert_eq!(
            props(&buffer),
            [
                glyph_props::BASE_GLYPH,
                glyph_props::MARK,
                glyph_props::BASE_GLYPH
            ]
        );
    }

    #[test]
    fn ignore_flags() {
        let gdef = Gdef::read(test_data::GDEF_V1_2.into()).unwrap();
        let mut buffer = buffer(&[5, 10, 20]);
        set_glyph_props_from_gdef(Some(&gdef), &mut buffer);
        let [base, lig, mark] = [&buffer.info[0], &buffer.info[1], &buffer.info[2]];

        let ignore_marks = LookupFlag::IGNORE_MARKS.to_props();
        assert!(check_glyph_property(base, ignore_marks, Some(&gdef)));
        assert!(!check_glyph_property(mark, ignore_marks, Some(&gdef)));

        let ignore_ligs = LookupFlag::IGNORE_LIGATURES.to_props();
        assert!(!check_glyph_property(lig, ignore_ligs, Some(&gdef)));
        assert!(check_glyph_property(mark, ignore_ligs, Some(&gdef)));

        let ignore_bases = LookupFlag::IGNORE_BASE_GLYPHS.to_props();
        assert!(!check_glyph_property(base, ignore_bases, Some(&gdef)));
    }

    #[test]
    fn mark_attachment_type() {
        let gdef = Gdef::read(test_data::GDEF_V1_2.into()).unwrap();
        let mut buffer = buffer(&[20, 27]);
        set_glyph_props_from_gdef(Some(&gdef), &mut buffer);
        let mut flag = LookupFlag::empty();
        flag.set_mark_attachment_class(1);
        let props = flag.to_props();
        assert!(check_glyph_property(&buffer.info[0], props, Some(&gdef)));
        assert!(!check_glyph_property(&buffer.info[1], props, Some(&gdef)));
    }

    #[test]
    fn mark_filtering_set() {
        let gdef = Gdef::read(test_data::GDEF_V1_2.into()).unwrap();
        let mut buffer = buffer(&[21, 22, 5]);
        set_glyph_props_from_gdef(Some(&gdef), &mut buffer);
        let props = LookupFlag::USE_MARK_FILTERING_SET.to_props();
        assert!(check_glyph_property(&buffer.info[0], props, Some(&gdef)));
        assert!(!check_glyph_property(&buffer.info[1], props, Some(&gdef)));
        // bases are never filtered by the set
        assert!(check_glyph_property(&buffer.info[2], props, Some(&gdef)));
        // no GDEF, no set
        assert!(!check_glyph_property(&buffer.info[0], props, None));
    }
}
