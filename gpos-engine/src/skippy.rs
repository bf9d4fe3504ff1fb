//! Finding the neighbours of a glyph while honouring the lookup flags.

use read_gpos::types::GlyphId;

use crate::{apply::ApplyContext, buffer::GlyphInfo, glyph_props::check_glyph_property};

/// Decides whether a glyph matches the item currently being looked for.
///
/// The second argument is the number of items still to be found, including
/// this one.
pub(crate) type MatchFn<'m> = dyn Fn(GlyphId, u16) -> bool + 'm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Match {
    No,
    Yes,
    Maybe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Skip {
    No,
    Yes,
    Maybe,
}

/// A cursor that steps over glyphs the current lookup ignores.
pub(crate) struct SkippyIter<'a, 'b> {
    ctx: &'b ApplyContext<'a>,
    buf_idx: usize,
    num_items: u16,
    lookup_props: u32,
    ignore_zwj: bool,
    mask: u32,
    syllable: u8,
    matching: Option<&'b MatchFn<'b>>,
}

impl<'a, 'b> SkippyIter<'a, 'b> {
    /// Create an iterator that will look for `num_items` glyphs around `start`.
    ///
    /// A `context_match` iterator matches glyphs regardless of their mask
    /// and always skips over joiners.
    pub fn new(ctx: &'b ApplyContext<'a>, start: usize, num_items: u16, context_match: bool) -> Self {
        let mut iter = SkippyIter {
            ctx,
            buf_idx: start,
            num_items,
            lookup_props: ctx.lookup_props,
            ignore_zwj: context_match || ctx.auto_zwj,
            mask: if context_match { u32::MAX } else { ctx.lookup_mask },
            syllable: 0,
            matching: None,
        };
        iter.reset(start, num_items);
        iter
    }

    /// Start over from `start`, looking for `num_items` glyphs.
    ///
    /// Matches are confined to the current glyph's syllable only when the
    /// search starts at the current glyph.
    pub fn reset(&mut self, start: usize, num_items: u16) {
        self.buf_idx = start;
        self.num_items = num_items;
        self.syllable = match self.ctx.buffer.info.get(start) {
            Some(info) if self.ctx.per_syllable && start == self.ctx.buffer.idx => info.syllable,
            _ => 0,
        };
    }

    pub fn set_lookup_props(&mut self, lookup_props: u32) {
        self.lookup_props = lookup_props;
    }

    pub fn enable_matching(&mut self, matching: &'b MatchFn<'b>) {
        self.matching = Some(matching);
    }

    /// The position of the last glyph found.
    pub fn index(&self) -> usize {
        self.buf_idx
    }

    /// Look for one more item after the current position.
    pub fn next(&mut self) -> bool {
        let len = self.ctx.buffer.len();
        while self.num_items > 0 && self.buf_idx + (self.num_items as usize) < len {
            self.buf_idx += 1;
            if let Some(found) = self.visit(self.buf_idx) {
                return found;
            }
        }
        false
    }

    /// Look for one more item before the current position.
    pub fn prev(&mut self) -> bool {
        while self.num_items > 0 && self.buf_idx >= self.num_items as usize {
            self.buf_idx -= 1;
            if let Some(found) = self.visit(self.buf_idx) {
                return found;
            }
        }
        false
    }

    /// Give up on the glyph just found and look for another in its place.
    pub fn reject(&mut self) {
        self.num_items += 1;
    }

    // `None` means the glyph was skipped and the search continues
    fn visit(&mut self, idx: usize) -> Option<bool> {
        let info = &self.ctx.buffer.info[idx];
        let skip = self.may_skip(info);
        if skip == Skip::Yes {
            return None;
        }
        let matched = self.may_match(info);
        if matched == Match::Yes || (matched == Match::Maybe && skip == Skip::No) {
            self.num_items -= 1;
            return Some(true);
        }
        if skip == Skip::No {
            return Some(false);
        }
        None
    }

    fn may_match(&self, info: &GlyphInfo) -> Match {
        if info.mask & self.mask == 0 || (self.syllable != 0 && info.syllable != self.syllable) {
            return Match::No;
        }
        match self.matching {
            Some(matching) if matching(info.glyph_id, self.num_items) => Match::Yes,
            Some(_) => Match::No,
            None => Match::Maybe,
        }
    }

    fn may_skip(&self, info: &GlyphInfo) -> Skip {
        if !check_glyph_property(info, self.lookup_props, self.ctx.gdef) {
            return Skip::Yes;
        }
        // positioning always looks through non-joiners and other default ignorables
        if info.is_default_ignorable() && (self.ignore_zwj || !info.is_zwj()) {
            return Skip::Maybe;
        }
        Skip::No
    }
}
