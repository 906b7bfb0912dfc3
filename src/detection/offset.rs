//! Offset unit conversion
//!
//! Spans are addressed in UTF-8 bytes. CoreNLP reports Java string indices
//! (UTF-16 code units) and Stanza reports Unicode scalar indices, so backend
//! offsets are converted once at the adapter boundary.

use serde::{Deserialize, Serialize};

/// Unit a backend reports offsets in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetUnit {
    /// UTF-8 bytes
    Byte,
    /// Unicode scalar values
    Char,
    /// UTF-16 code units
    Utf16,
}

/// Maps offsets in one unit to byte offsets of a fixed text
///
/// `positions[i]` is the byte offset of unit index `i`, or `None` when `i`
/// falls inside a multi-unit character.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    unit: OffsetUnit,
    positions: Vec<Option<usize>>,
}

impl OffsetMap {
    /// Build the map for `text`
    pub fn new(text: &str, unit: OffsetUnit) -> Self {
        let mut positions = Vec::with_capacity(text.len() + 1);

        for (byte_idx, ch) in text.char_indices() {
            positions.push(Some(byte_idx));
            let width = match unit {
                OffsetUnit::Byte => ch.len_utf8(),
                OffsetUnit::Char => 1,
                OffsetUnit::Utf16 => ch.len_utf16(),
            };
            for _ in 1..width {
                positions.push(None);
            }
        }
        positions.push(Some(text.len()));

        Self { unit, positions }
    }

    /// Unit this map converts from
    pub fn unit(&self) -> OffsetUnit {
        self.unit
    }

    /// Byte offset for `offset`, `None` if out of range or mid-character
    pub fn to_byte(&self, offset: usize) -> Option<usize> {
        self.positions.get(offset).copied().flatten()
    }

    /// Byte range for `start..end`
    pub fn to_byte_range(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let start = self.to_byte(start)?;
        let end = self.to_byte(end)?;
        (start <= end).then_some((start, end))
    }
}
