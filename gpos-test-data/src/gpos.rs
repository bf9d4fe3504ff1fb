//! GPOS test data.
//!
//! Most of these subtables are modelled on the examples in the
//! [OpenType GPOS documentation](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos).

use crate::bebuffer::BeBuffer;

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-2-singleposformat1-subtable
#[rustfmt::skip]
pub static SINGLEPOSFORMAT1: &[u8] = &[
    0x00, 0x01,             // format 1
    0x00, 0x08,             // coverage offset
    0x00, 0x02,             // valueFormat: Y_PLACEMENT
    0xFF, 0xB0,             // yPlacement: -80
    // coverage
    0x00, 0x02, 0x00, 0x01, // format 2, one range
    0x01, 0xB3, 0x01, 0xBC, 0x00, 0x00,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-3-singleposformat2-subtable
#[rustfmt::skip]
pub static SINGLEPOSFORMAT2: &[u8] = &[
    0x00, 0x02,             // format 2
    0x00, 0x14,             // coverage offset
    0x00, 0x05,             // valueFormat: X_PLACEMENT | X_ADVANCE
    0x00, 0x03,             // valueCount
    0x00, 0x32, 0x00, 0x32, // 50, 50
    0x00, 0x19, 0x00, 0x19, // 25, 25
    0x00, 0x0A, 0x00, 0x0A, // 10, 10
    // coverage
    0x00, 0x01, 0x00, 0x03,
    0x00, 0x4F, 0x01, 0x25, 0x01, 0x29,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-4-pairposformat1-subtable
#[rustfmt::skip]
pub static PAIRPOSFORMAT1: &[u8] = &[
    0x00, 0x01,             // format 1
    0x00, 0x1E,             // coverage offset
    0x00, 0x04,             // valueFormat1: X_ADVANCE
    0x00, 0x01,             // valueFormat2: X_PLACEMENT
    0x00, 0x02,             // pairSetCount
    0x00, 0x0E,             // pairSet[0]
    0x00, 0x16,             // pairSet[1]
    // pairSet[0]
    0x00, 0x01,
    0x00, 0x59, 0xFF, 0xE2, 0xFF, 0xEC, // 'o', -30, -20
    // pairSet[1]
    0x00, 0x01,
    0x00, 0x59, 0xFF, 0xD8, 0xFF, 0xE7, // 'o', -40, -25
    // coverage
    0x00, 0x01, 0x00, 0x02,
    0x00, 0x2D, 0x00, 0x31,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-5-pairposformat2-subtable
#[rustfmt::skip]
pub static PAIRPOSFORMAT2: &[u8] = &[
    0x00, 0x02,             // format 2
    0x00, 0x18,             // coverage offset
    0x00, 0x04,             // valueFormat1: X_ADVANCE
    0x00, 0x00,             // valueFormat2: none
    0x00, 0x22,             // classDef1 offset
    0x00, 0x32,             // classDef2 offset
    0x00, 0x02,             // class1Count
    0x00, 0x02,             // class2Count
    0x00, 0x00, 0x00, 0x00, // class1 0
    0x00, 0x00, 0xFF, 0xCE, // class1 1: -50 against class2 1
    // coverage
    0x00, 0x01, 0x00, 0x03,
    0x00, 0x46, 0x00, 0x47, 0x00, 0x49,
    // classDef1
    0x00, 0x02, 0x00, 0x02,
    0x00, 0x46, 0x00, 0x47, 0x00, 0x01,
    0x00, 0x49, 0x00, 0x49, 0x00, 0x01,
    // classDef2
    0x00, 0x02, 0x00, 0x01,
    0x00, 0x6A, 0x00, 0x6B, 0x00, 0x01,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-6-cursiveposformat1-subtable
#[rustfmt::skip]
pub static CURSIVEPOSFORMAT1: &[u8] = &[
    0x00, 0x01,             // format 1
    0x00, 0x0E,             // coverage offset
    0x00, 0x02,             // entryExitCount
    0x00, 0x16, 0x00, 0x1C, // entry/exit for glyph 0x203
    0x00, 0x22, 0x00, 0x28, // entry/exit for glyph 0x206
    // coverage
    0x00, 0x01, 0x00, 0x02,
    0x02, 0x03, 0x02, 0x06,
    // anchors
    0x00, 0x01, 0x05, 0xDC, 0x00, 0x2C,
    0x00, 0x01, 0x00, 0x00, 0xFF, 0xEC,
    0x00, 0x01, 0x05, 0xDC, 0x00, 0x2C,
    0x00, 0x01, 0x00, 0x00, 0xFF, 0xEC,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-7-markbaseposformat1-subtable
#[rustfmt::skip]
pub static MARKBASEPOSFORMAT1: &[u8] = &[
    0x00, 0x01,             // format 1
    0x00, 0x0C,             // markCoverage offset
    0x00, 0x14,             // baseCoverage offset
    0x00, 0x02,             // markClassCount
    0x00, 0x1A,             // markArray offset
    0x00, 0x30,             // baseArray offset
    // markCoverage
    0x00, 0x01, 0x00, 0x02,
    0x03, 0x33, 0x03, 0x3F,
    // baseCoverage
    0x00, 0x01, 0x00, 0x01,
    0x01, 0x90,
    // markArray
    0x00, 0x02,
    0x00, 0x00, 0x00, 0x0A,
    0x00, 0x01, 0x00, 0x10,
    0x00, 0x01, 0x01, 0x5A, 0xFF, 0x9E,
    0x00, 0x01, 0x01, 0x05, 0x00, 0x58,
    // baseArray
    0x00, 0x01,
    0x00, 0x06, 0x00, 0x0C,
    0x00, 0x01, 0x01, 0x27, 0x04, 0x79,
    0x00, 0x01, 0x03, 0x3E, 0x00, 0x58,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-8-markligposformat1-subtable
#[rustfmt::skip]
pub static MARKLIGPOSFORMAT1: &[u8] = &[
    0x00, 0x01,             // format 1
    0x00, 0x0C,             // markCoverage offset
    0x00, 0x14,             // ligatureCoverage offset
    0x00, 0x02,             // markClassCount
    0x00, 0x1A,             // markArray offset
    0x00, 0x30,             // ligatureArray offset
    // markCoverage
    0x00, 0x01, 0x00, 0x02,
    0x03, 0x33, 0x03, 0x3F,
    // ligatureCoverage
    0x00, 0x01, 0x00, 0x01,
    0x02, 0x34,
    // markArray
    0x00, 0x02,
    0x00, 0x00, 0x00, 0x0A,
    0x00, 0x01, 0x00, 0x10,
    0x00, 0x01, 0x01, 0x5A, 0xFF, 0x9E,
    0x00, 0x01, 0x01, 0x05, 0x00, 0x58,
    // ligatureArray
    0x00, 0x01,
    0x00, 0x04,
    // ligatureAttach
    0x00, 0x03,
    0x00, 0x0E, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x14,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x01, 0x00, 0xDD, 0x01, 0x2D,
    0x00, 0x01, 0x02, 0x74, 0x01, 0x2D,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-9-markmarkposformat1-subtable
#[rustfmt::skip]
pub static MARKMARKPOSFORMAT1: &[u8] = &[
    0x00, 0x01,             // format 1
    0x00, 0x0C,             // mark1Coverage offset
    0x00, 0x12,             // mark2Coverage offset
    0x00, 0x01,             // markClassCount
    0x00, 0x18,             // mark1Array offset
    0x00, 0x24,             // mark2Array offset
    // mark1Coverage
    0x00, 0x01, 0x00, 0x01,
    0x02, 0x96,
    // mark2Coverage
    0x00, 0x01, 0x00, 0x01,
    0x02, 0x89,
    // mark1Array
    0x00, 0x01,
    0x00, 0x00, 0x00, 0x06,
    0x00, 0x01, 0x00, 0xBD, 0xFF, 0x99,
    // mark2Array
    0x00, 0x01,
    0x00, 0x04,
    0x00, 0x01, 0x00, 0xDD, 0x01, 0x2D,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-14-valueformat-table-and-valuerecord
#[rustfmt::skip]
pub static VALUEFORMATTABLE: &[u8] = &[
    0x00, 0x01,             // format 1
    0x00, 0x0E,             // coverage offset
    0x00, 0x99,             // X_PLACEMENT | Y_ADVANCE | X_PLACEMENT_DEVICE | Y_ADVANCE_DEVICE
    0x00, 0x50,             // xPlacement: 80
    0x00, 0xD2,             // yAdvance: 210
    0x00, 0x00,             // xPlaDevice: null
    0x00, 0x14,             // yAdvDevice offset
    // coverage
    0x00, 0x01, 0x00, 0x01,
    0x00, 0x3A,
    // device table: sizes 11..=15, 2-bit deltas
    0x00, 0x0B, 0x00, 0x0F, 0x00, 0x01, 0x55, 0x40,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-15-anchorformat1-table
#[rustfmt::skip]
pub static ANCHORFORMAT1: &[u8] = &[
    0x00, 0x01, 0x00, 0xBD, 0xFF, 0x99,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-16-anchorformat2-table
#[rustfmt::skip]
pub static ANCHORFORMAT2: &[u8] = &[
    0x00, 0x02, 0x01, 0x42, 0x01, 0x5E, 0x00, 0x0D,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-17-anchorformat3-table
#[rustfmt::skip]
pub static ANCHORFORMAT3: &[u8] = &[
    0x00, 0x03,             // format 3
    0x01, 0x17,             // x: 279
    0x05, 0x15,             // y: 1301
    0x00, 0x0A,             // xDevice offset
    0x00, 0x14,             // yDevice offset
    0x00, 0x0B, 0x00, 0x0F, 0x00, 0x02, 0x11, 0x11, 0x22, 0x00,
    0x00, 0x0B, 0x00, 0x0F, 0x00, 0x02, 0x11, 0x11, 0x22, 0x00,
];

/// A lookup to be placed in a synthetic GPOS table.
#[derive(Clone, Debug)]
pub struct TestLookup {
    pub lookup_type: u16,
    pub lookup_flag: u16,
    pub mark_filtering_set: Option<u16>,
    pub subtables: Vec<Vec<u8>>,
}

impl TestLookup {
    pub fn new(lookup_type: u16, subtables: impl IntoIterator<Item = Vec<u8>>) -> Self {
        TestLookup {
            lookup_type,
            lookup_flag: 0,
            mark_filtering_set: None,
            subtables: subtables.into_iter().collect(),
        }
    }

    pub fn with_flag(mut self, flag: u16) -> Self {
        self.lookup_flag = flag;
        self
    }

    pub fn with_mark_filtering_set(mut self, set: u16) -> Self {
        self.lookup_flag |= 0x0010;
        self.mark_filtering_set = Some(set);
        self
    }

    /// Serialize this lookup, with its subtables following the header.
    pub fn build(&self) -> Vec<u8> {
        let header_len = 6
            + 2 * self.subtables.len()
            + if self.mark_filtering_set.is_some() { 2 } else { 0 };
        let mut buf = BeBuffer::new()
            .push(self.lookup_type)
            .push(self.lookup_flag)
            .push(self.subtables.len() as u16);
        let mut pos = header_len;
        for subtable in &self.subtables {
            buf = buf.push(pos as u16);
            pos += subtable.len();
        }
        if let Some(set) = self.mark_filtering_set {
            buf = buf.push(set);
        }
        for subtable in &self.subtables {
            buf = buf.append(subtable);
        }
        buf.into_vec()
    }
}

/// Build a version 1.0 GPOS table with empty script and feature lists.
pub fn gpos_with_lookups(lookups: &[TestLookup]) -> Vec<u8> {
    let built: Vec<_> = lookups.iter().map(TestLookup::build).collect();
    // header (10) + empty script list (2) + empty feature list (2)
    let lookup_list_start = 14usize;
    let mut buf = BeBuffer::new()
        .push(1u16)
        .push(0u16)
        .push(10u16)
        .push(12u16)
        .push(lookup_list_start as u16)
        .push(0u16)
        .push(0u16)
        .push(built.len() as u16);
    let mut pos = 2 + 2 * built.len();
    for lookup in &built {
        buf = buf.push(pos as u16);
        pos += lookup.len();
    }
    for lookup in &built {
        buf = buf.append(lookup);
    }
    buf.into_vec()
}

/// Wrap a subtable in an extension (lookup type 9) subtable.
pub fn extension(extension_lookup_type: u16, subtable: &[u8]) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(extension_lookup_type)
        .push(8u32)
        .append(subtable)
        .into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_layout() {
        let lookup = TestLookup::new(1, [SINGLEPOSFORMAT1.to_vec()]).with_mark_filtering_set(3);
        let bytes = lookup.build();
        // type, flag, count, offset, filtering set
        assert_eq!(&bytes[..10], &[0, 1, 0, 0x10, 0, 1, 0, 10, 0, 3]);
        assert_eq!(&bytes[10..], SINGLEPOSFORMAT1);
    }

    #[test]
    fn gpos_layout() {
        let bytes = gpos_with_lookups(&[TestLookup::new(1, [SINGLEPOSFORMAT1.to_vec()])]);
        assert_eq!(&bytes[..4], &[0, 1, 0, 0]);
        // lookup count, then offset to the first lookup
        assert_eq!(&bytes[14..18], &[0, 1, 0, 4]);
    }
}
