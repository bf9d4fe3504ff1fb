//! A sparse set of integers, used for glyph and lookup closure.
//!
//! Members are stored in 512 bit pages keyed by the high bits of the value,
//! so that dense runs of glyph ids (the common case for coverage tables)
//! are cheap to insert and query.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::ops::RangeInclusive;

use types::{GlyphId, GlyphId16};

// the integer type underlying a page
type Element = u64;

// the number of elements in a page
const PAGE_SIZE: u32 = 8;
// the length of an element in bits
const ELEM_BITS: u32 = Element::BITS;
// mask out bits of a value not used to index into an element
const ELEM_MASK: u32 = ELEM_BITS - 1;
// the number of bits in a page
const PAGE_BITS: u32 = ELEM_BITS * PAGE_SIZE;
// mask out the bits of a value not used to index into a page
const PAGE_MASK: u32 = PAGE_BITS - 1;

type Page = [Element; PAGE_SIZE as usize];

/// A value that can be stored in an [`IntSet`].
pub trait Domain: Copy {
    fn to_u32(&self) -> u32;
    fn from_u32(value: u32) -> Self;
}

/// A set of integers (or integer-like values such as glyph ids).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IntSet<T> {
    pages: BTreeMap<u32, Page>,
    len: usize,
    phantom: PhantomData<T>,
}

impl<T> Default for IntSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> IntSet<T> {
    /// Create a new, empty set.
    pub fn empty() -> Self {
        IntSet {
            pages: BTreeMap::new(),
            len: 0,
            phantom: PhantomData,
        }
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove all members.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.len = 0;
    }
}

fn split(value: u32) -> (u32, usize, Element) {
    let major = value / PAGE_BITS;
    let minor = value & PAGE_MASK;
    let elem = (minor / ELEM_BITS) as usize;
    let bit = 1 << (minor & ELEM_MASK);
    (major, elem, bit)
}

impl<T: Domain> IntSet<T> {
    /// Add `value` to the set, returning `true` if it was not already present.
    pub fn insert(&mut self, value: T) -> bool {
        let (major, elem, bit) = split(value.to_u32());
        let page = self.pages.entry(major).or_default();
        let inserted = page[elem] & bit == 0;
        page[elem] |= bit;
        self.len += inserted as usize;
        inserted
    }

    /// Add every value in the inclusive range.
    pub fn insert_range(&mut self, range: RangeInclusive<T>) {
        let start = range.start().to_u32();
        let end = range.end().to_u32();
        if start > end {
            return;
        }
        let mut value = start;
        loop {
            let (major, elem, _) = split(value);
            let minor = value & ELEM_MASK;
            // fill the rest of this element, or up to the end of the range
            let last = end.min(value | ELEM_MASK);
            let count = last - value + 1;
            let mask = if count == ELEM_BITS {
                Element::MAX
            } else {
                ((1 << count) - 1) << minor
            };
            let page = self.pages.entry(major).or_default();
            let added = (mask & !page[elem]).count_ones();
            page[elem] |= mask;
            self.len += added as usize;
            if last == end {
                break;
            }
            value = last + 1;
        }
    }

    /// Remove `value`, returning `true` if it was present.
    pub fn remove(&mut self, value: T) -> bool {
        let (major, elem, bit) = split(value.to_u32());
        let Some(page) = self.pages.get_mut(&major) else {
            return false;
        };
        let removed = page[elem] & bit != 0;
        page[elem] &= !bit;
        if page.iter().all(|e| *e == 0) {
            self.pages.remove(&major);
        }
        self.len -= removed as usize;
        removed
    }

    pub fn contains(&self, value: T) -> bool {
        let (major, elem, bit) = split(value.to_u32());
        self.pages
            .get(&major)
            .map(|page| page[elem] & bit != 0)
            .unwrap_or(false)
    }

    /// Returns `true` if any value in the inclusive range is a member.
    pub fn intersects_range(&self, range: RangeInclusive<T>) -> bool {
        let start = range.start().to_u32();
        let end = range.end().to_u32();
        start <= end && self.iter_from(start).next().is_some_and(|v| v.to_u32() <= end)
    }

    /// Returns `true` if the two sets share a member.
    pub fn intersects_set(&self, other: &IntSet<T>) -> bool {
        let (small, large) = if self.pages.len() <= other.pages.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.pages.iter().any(|(major, page)| {
            large
                .pages
                .get(major)
                .is_some_and(|other| page.iter().zip(other).any(|(a, b)| a & b != 0))
        })
    }

    /// Add all members of `other` to this set.
    pub fn union(&mut self, other: &IntSet<T>) {
        for (major, page) in &other.pages {
            let ours = self.pages.entry(*major).or_default();
            for (a, b) in ours.iter_mut().zip(page) {
                self.len += (b & !*a).count_ones() as usize;
                *a |= b;
            }
        }
    }

    /// Remove all members of `other` from this set.
    pub fn subtract(&mut self, other: &IntSet<T>) {
        for (major, page) in &other.pages {
            if let Some(ours) = self.pages.get_mut(major) {
                for (a, b) in ours.iter_mut().zip(page) {
                    self.len -= (*a & b).count_ones() as usize;
                    *a &= !b;
                }
            }
        }
        self.pages.retain(|_, page| page.iter().any(|e| *e != 0));
    }

    /// Iterate over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.iter_from(0)
    }

    /// Iterate over the members that are greater than or equal to `start`.
    fn iter_from(&self, start: u32) -> impl Iterator<Item = T> + '_ {
        let first_page = start / PAGE_BITS;
        self.pages
            .range(first_page..)
            .flat_map(|(major, page)| {
                page.iter().enumerate().flat_map(move |(i, elem)| {
                    let base = major * PAGE_BITS + i as u32 * ELEM_BITS;
                    Bits(*elem).map(move |bit| base + bit)
                })
            })
            .skip_while(move |v| *v < start)
            .map(T::from_u32)
    }

    /// The smallest member, if any.
    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }
}

// iterates the set bits of an element, lowest first
struct Bits(Element);

impl Iterator for Bits {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(bit)
    }
}

impl<T: Domain> Extend<T> for IntSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Domain> FromIterator<T> for IntSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = IntSet::empty();
        set.extend(iter);
        set
    }
}

impl<T: Domain, const N: usize> From<[T; N]> for IntSet<T> {
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<T: Domain + std::fmt::Debug> std::fmt::Debug for IntSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Domain for u32 {
    fn to_u32(&self) -> u32 {
        *self
    }

    fn from_u32(value: u32) -> Self {
        value
    }
}

impl Domain for u16 {
    fn to_u32(&self) -> u32 {
        *self as u32
    }

    fn from_u32(value: u32) -> Self {
        value as u16
    }
}

impl Domain for GlyphId {
    fn to_u32(&self) -> u32 {
        GlyphId::to_u32(*self)
    }

    fn from_u32(value: u32) -> Self {
        GlyphId::new(value)
    }
}

impl Domain for GlyphId16 {
    fn to_u32(&self) -> u32 {
        GlyphId16::to_u32(*self)
    }

    fn from_u32(value: u32) -> Self {
        GlyphId16::new(value as u16)
    }
}
